// =============================================================================
// RANGE-EDIT REQUEST BUILDER
// =============================================================================
//
// Builds `documents.batchUpdate` requests. The service applies a batch in
// array order and every insert/delete shifts the offsets after it, so each
// builder here keeps its batch shape simple:
//
// - style updates never change offsets, so any number can share a batch
// - a delete is always followed by an insert at the delete's start
// - multiple inserts are ordered from the highest offset down
//
// See: https://developers.google.com/docs/api/reference/rest/v1/documents/request

use serde::Serialize;

use super::docs_service::DocsError;
use super::document_models::{FormatInstruction, OffsetRange, TableGrid, UpdateMode};

// =============================================================================
// REQUEST SCHEMA
// =============================================================================

/// One entry of a `batchUpdate` `requests` array.
///
/// Serializes externally tagged, e.g. `{"insertText": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditRequest {
    InsertText(InsertTextRequest),
    DeleteContentRange(DeleteContentRangeRequest),
    UpdateTextStyle(UpdateTextStyleRequest),
    UpdateParagraphStyle(UpdateParagraphStyleRequest),
    InsertTable(InsertTableRequest),
    UpdateTableRowStyle(UpdateTableRowStyleRequest),
    UpdateTableCellStyle(UpdateTableCellStyleRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_index: u32,
    pub end_index: u32,
}

impl From<OffsetRange> for Range {
    fn from(range: OffsetRange) -> Self {
        Self {
            start_index: range.start,
            end_index: range.end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertTextRequest {
    pub location: Location,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteContentRangeRequest {
    pub range: Range,
}

/// Only the fields that are `Some` are serialized and named in `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyleRequest {
    pub range: Range,
    pub text_style: TextStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStyle {
    pub named_style_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParagraphStyleRequest {
    pub range: Range,
    pub paragraph_style: ParagraphStyle,
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertTableRequest {
    pub rows: u32,
    pub columns: u32,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRowStyle {
    pub table_header: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableRowStyleRequest {
    pub table_start_location: Location,
    pub row_indices: Vec<u32>,
    pub table_row_style: TableRowStyle,
    pub fields: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RgbColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    pub rgb_color: RgbColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptionalColor {
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellStyle {
    pub background_color: OptionalColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellLocation {
    pub table_start_location: Location,
    pub row_index: u32,
    pub column_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRange {
    pub table_cell_location: TableCellLocation,
    pub row_span: u32,
    pub column_span: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableCellStyleRequest {
    pub table_range: TableRange,
    pub table_cell_style: TableCellStyle,
    pub fields: String,
}

impl EditRequest {
    pub fn insert_text(index: u32, text: impl Into<String>) -> Self {
        EditRequest::InsertText(InsertTextRequest {
            location: Location { index },
            text: text.into(),
        })
    }

    pub fn delete_range(range: OffsetRange) -> Self {
        EditRequest::DeleteContentRange(DeleteContentRangeRequest {
            range: range.into(),
        })
    }

    pub fn insert_table(index: u32, rows: u32, columns: u32) -> Self {
        EditRequest::InsertTable(InsertTableRequest {
            rows,
            columns,
            location: Location { index },
        })
    }
}

// =============================================================================
// STYLE APPLICATION
// =============================================================================

/// Docs named style for heading levels 1 to 3.
pub fn heading_style_name(level: u8) -> Option<&'static str> {
    match level {
        1 => Some("HEADING_1"),
        2 => Some("HEADING_2"),
        3 => Some("HEADING_3"),
        _ => None,
    }
}

fn text_style_for(instruction: &FormatInstruction) -> Option<(TextStyle, String)> {
    let style = TextStyle {
        bold: instruction.bold,
        italic: instruction.italic,
        underline: instruction.underline,
    };

    let fields: Vec<&str> = [
        ("bold", style.bold),
        ("italic", style.italic),
        ("underline", style.underline),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_some())
    .map(|(name, _)| name)
    .collect();

    if fields.is_empty() {
        None
    } else {
        Some((style, fields.join(",")))
    }
}

/// Style requests for one instruction over its located ranges.
///
/// Per range: an `updateTextStyle` when any of bold/italic/underline is set,
/// then an `updateParagraphStyle` when a heading is set.
pub fn style_requests(
    instruction: &FormatInstruction,
    ranges: &[OffsetRange],
) -> Result<Vec<EditRequest>, DocsError> {
    let heading = match instruction.heading {
        Some(level) => Some(heading_style_name(level).ok_or_else(|| {
            DocsError::InvalidArgument(format!(
                "Heading level must be 1, 2 or 3 (got {})",
                level
            ))
        })?),
        None => None,
    };
    let text_style = text_style_for(instruction);

    let mut requests = Vec::new();
    for range in ranges {
        if let Some((style, fields)) = &text_style {
            requests.push(EditRequest::UpdateTextStyle(UpdateTextStyleRequest {
                range: (*range).into(),
                text_style: style.clone(),
                fields: fields.clone(),
            }));
        }

        if let Some(named_style_type) = heading {
            requests.push(EditRequest::UpdateParagraphStyle(
                UpdateParagraphStyleRequest {
                    range: (*range).into(),
                    paragraph_style: ParagraphStyle {
                        named_style_type: named_style_type.to_string(),
                    },
                    fields: "namedStyleType".to_string(),
                },
            ));
        }
    }

    Ok(requests)
}

// =============================================================================
// CONTENT UPDATES
// =============================================================================

/// Requests that write `content` into a document whose body ends at `body_end`.
///
/// `Replace` clears `[1, body_end - 1)` (the trailing newline stays) and
/// inserts at 1. `Append` inserts `"\n" + content` before the trailing newline.
pub fn content_update_requests(mode: UpdateMode, body_end: u32, content: &str) -> Vec<EditRequest> {
    let last_writable = body_end.saturating_sub(1).max(1);

    match mode {
        UpdateMode::Replace => {
            let mut requests = Vec::with_capacity(2);
            if last_writable > 1 {
                requests.push(EditRequest::delete_range(OffsetRange {
                    start: 1,
                    end: last_writable,
                }));
            }
            if !content.is_empty() {
                requests.push(EditRequest::insert_text(1, content));
            }
            requests
        }
        UpdateMode::Append => {
            vec![EditRequest::insert_text(last_writable, format!("\n{}", content))]
        }
    }
}

// =============================================================================
// TABLE CONVERSION
// =============================================================================

/// First batch of a table conversion: drop the markdown source, then insert an
/// empty table where it started.
pub fn table_insertion_requests(grid: &TableGrid, source: OffsetRange) -> Vec<EditRequest> {
    let mut requests = Vec::with_capacity(2);
    if source.end > source.start {
        requests.push(EditRequest::delete_range(source));
    }
    requests.push(EditRequest::insert_table(
        source.start,
        grid.row_count() as u32,
        grid.column_count() as u32,
    ));
    requests
}

/// Header row background, a light blue.
const HEADER_BACKGROUND: RgbColor = RgbColor {
    red: 0.26,
    green: 0.52,
    blue: 0.95,
};

/// Marks row 0 of the table starting at `table_start` as a header row and
/// shades its cells. Neither request moves any offset.
pub fn header_row_requests(table_start: u32, columns: u32) -> Vec<EditRequest> {
    let table_start_location = Location { index: table_start };

    vec![
        EditRequest::UpdateTableRowStyle(UpdateTableRowStyleRequest {
            table_start_location,
            row_indices: vec![0],
            table_row_style: TableRowStyle { table_header: true },
            fields: "tableHeader".to_string(),
        }),
        EditRequest::UpdateTableCellStyle(UpdateTableCellStyleRequest {
            table_range: TableRange {
                table_cell_location: TableCellLocation {
                    table_start_location,
                    row_index: 0,
                    column_index: 0,
                },
                row_span: 1,
                column_span: columns,
            },
            table_cell_style: TableCellStyle {
                background_color: OptionalColor {
                    color: Color {
                        rgb_color: HEADER_BACKGROUND,
                    },
                },
            },
            fields: "backgroundColor".to_string(),
        }),
    ]
}
