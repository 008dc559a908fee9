// Docs domain models.
//
// The `Document` family mirrors the part of the Google Docs v1 JSON that the
// offset logic reads. Everything else in here is request-scoped working data
// built from one document snapshot and thrown away after one batch.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// ============================================================================
// EXTERNAL DOCUMENT SNAPSHOT
// ============================================================================

/// A document as returned by `documents.get` / `documents.create`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub document_id: String,
    #[serde(default)]
    pub title: String,
    pub body: Option<Body>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Body {
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

/// One block of the body. The leading section break has no `startIndex`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralElement {
    pub start_index: Option<u32>,
    pub end_index: Option<u32>,
    pub paragraph: Option<Paragraph>,
    pub table: Option<Table>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    #[serde(default)]
    pub elements: Vec<ParagraphElement>,
    pub paragraph_style: Option<ParagraphStyle>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub named_style_type: Option<String>,
}

/// Inline element. Only text runs matter here; images, breaks and the like
/// deserialize with `text_run: None` and are skipped.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphElement {
    pub start_index: Option<u32>,
    pub text_run: Option<TextRun>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default)]
    pub table_rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default)]
    pub table_cells: Vec<TableCell>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCell {
    pub start_index: Option<u32>,
    #[serde(default)]
    pub content: Vec<StructuralElement>,
}

// ============================================================================
// FLAT WORKING MODEL
// ============================================================================

/// One contiguous run of plain text tagged with its absolute document offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub text: String,
    pub start_offset: u32,
}

/// Half-open `[start, end)` range in UTF-16 code units, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetRange {
    pub start: u32,
    pub end: u32,
}

/// Parsed markdown table. Never empty once it leaves the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableGrid {
    pub rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column count is taken from the first row; ragged rows are not rejected.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Formatting request for every occurrence of `text`.
///
/// Unset style fields are left untouched in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FormatInstruction {
    pub text: String,
    #[serde(default)]
    pub bold: Option<bool>,
    #[serde(default)]
    pub italic: Option<bool>,
    #[serde(default)]
    pub underline: Option<bool>,
    #[serde(default)]
    pub heading: Option<u8>,
}

impl FormatInstruction {
    /// Whether any of bold/italic/underline is set.
    pub fn has_text_style(&self) -> bool {
        self.bold.is_some() || self.italic.is_some() || self.underline.is_some()
    }
}

/// How `update_doc` combines new content with the existing body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    Replace,
    #[default]
    Append,
}

impl std::fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateMode::Replace => write!(f, "replaced"),
            UpdateMode::Append => write!(f, "appended"),
        }
    }
}

/// Drive listing entry for a Google Doc.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub modified_time: Option<DateTime<Utc>>,
}

/// Result of a successful `create_doc`.
#[derive(Debug, Clone)]
pub struct CreatedDocument {
    pub document_id: String,
    pub title: String,
}

impl CreatedDocument {
    pub fn url(&self) -> String {
        format!("https://docs.google.com/document/d/{}/edit", self.document_id)
    }
}

/// Where the cell text of a converted table was placed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPlacement {
    /// Offsets read back from the re-fetched table structure.
    Structural,
    /// Fixed-stride estimate used when the table could not be found.
    Estimated,
}

/// Result of a successful `convert_to_table`.
#[derive(Debug, Clone)]
pub struct TableConversion {
    pub rows: usize,
    pub columns: usize,
    pub cells_written: usize,
    /// Rows wider than the header row; their extra cells were dropped.
    pub ragged_rows: usize,
    pub placement: CellPlacement,
}
