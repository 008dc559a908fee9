// Docs service - business logic for every document tool.
//
// The service never talks HTTP itself. It reads snapshots and submits batches
// through the `DocsApi` / `DriveApi` traits, so tests can drive it with an
// in-memory fake and the infra layer can plug in the real Google client.

use async_trait::async_trait;
use thiserror::Error;

use super::cell_offsets::{
    cell_text_requests, estimated_cell_offset, estimated_table_start, structural_cell_offsets,
};
use super::document_adapter::{body_end_offset, flatten_spans, plain_text};
use super::document_models::{
    CellPlacement, CreatedDocument, Document, DriveFile, FormatInstruction, TableConversion,
    UpdateMode,
};
use super::edit_requests::{
    content_update_requests, header_row_requests, style_requests, table_insertion_requests,
    EditRequest,
};
use super::markdown_table::parse_markdown_table;
use super::occurrence_locator::{locate_occurrences, locate_table_source};

/// Number of documents the listing resource shows.
pub const LIST_LIMIT: usize = 20;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum DocsError {
    #[error("Google API client not initialized. Check your Google credentials configuration.")]
    ClientNotInitialized,
    #[error("Text '{0}' not found in document")]
    TextNotFound(String),
    #[error("Could not find the table text in the document")]
    TableNotFound,
    #[error("No valid table data found")]
    EmptyTable,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Google API error: {0}")]
    Api(String),
}

// ============================================================================
// EXTERNAL COLLABORATORS
// ============================================================================

/// Docs v1 document operations.
#[async_trait]
pub trait DocsApi: Send + Sync {
    async fn create_document(&self, title: &str) -> Result<Document, DocsError>;
    async fn get_document(&self, document_id: &str) -> Result<Document, DocsError>;
    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[EditRequest],
    ) -> Result<(), DocsError>;
}

/// Drive v3 file operations.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Google Docs only, most recently modified first.
    async fn list_documents(&self, limit: usize) -> Result<Vec<DriveFile>, DocsError>;
    async fn delete_file(&self, file_id: &str) -> Result<(), DocsError>;
}

fn is_document_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Accepts a bare document id or a `docs.google.com/document/d/<id>/...` URL.
///
/// Ids are limited to `[A-Za-z0-9_-]` since they end up in request paths.
pub fn normalize_document_id(id_or_url: &str) -> Result<String, DocsError> {
    let trimmed = id_or_url.trim();

    let candidate = if trimmed.contains("docs.google.com") {
        trimmed.find("/document/d/").map(|start| {
            let after_d = &trimmed[start + "/document/d/".len()..];
            let end = after_d.find(['/', '?', '#']).unwrap_or(after_d.len());
            &after_d[..end]
        })
    } else {
        Some(trimmed)
    };

    match candidate {
        Some(id) if is_document_id(id) => Ok(id.to_string()),
        _ => Err(DocsError::InvalidArgument(format!(
            "Could not extract document ID from: {}",
            id_or_url
        ))),
    }
}

// ============================================================================
// SERVICE
// ============================================================================

pub struct DocsService<C: DocsApi + DriveApi> {
    client: C,
}

impl<C: DocsApi + DriveApi> DocsService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Creates a document and writes the optional initial content.
    pub async fn create_document(
        &self,
        title: &str,
        content: Option<&str>,
    ) -> Result<CreatedDocument, DocsError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(DocsError::InvalidArgument(
                "Document title must not be empty".to_string(),
            ));
        }

        let document = self.client.create_document(title).await?;
        if document.document_id.is_empty() {
            return Err(DocsError::Api(
                "Create response did not include a document id".to_string(),
            ));
        }

        if let Some(content) = content.filter(|c| !c.is_empty()) {
            self.client
                .batch_update(&document.document_id, &[EditRequest::insert_text(1, content)])
                .await?;
        }

        Ok(CreatedDocument {
            document_id: document.document_id,
            title: title.to_string(),
        })
    }

    /// Replaces or appends to the document body.
    pub async fn update_document(
        &self,
        document_id: &str,
        content: &str,
        mode: UpdateMode,
    ) -> Result<(), DocsError> {
        let document_id = normalize_document_id(document_id)?;
        let document = self.client.get_document(&document_id).await?;

        let requests = content_update_requests(mode, body_end_offset(&document), content);
        if requests.is_empty() {
            return Ok(());
        }

        self.client.batch_update(&document_id, &requests).await
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<(), DocsError> {
        let document_id = normalize_document_id(document_id)?;
        self.client.delete_file(&document_id).await
    }

    /// Applies every instruction to every occurrence of its text.
    ///
    /// All instructions are resolved against one snapshot before anything is
    /// submitted; a missing text aborts the whole call. Returns the number of
    /// requests sent.
    pub async fn format_document(
        &self,
        document_id: &str,
        instructions: &[FormatInstruction],
    ) -> Result<usize, DocsError> {
        if instructions.is_empty() {
            return Err(DocsError::InvalidArgument(
                "At least one format instruction is required".to_string(),
            ));
        }

        let document_id = normalize_document_id(document_id)?;
        let document = self.client.get_document(&document_id).await?;
        let spans = flatten_spans(&document);

        let mut requests = Vec::new();
        for instruction in instructions {
            if !instruction.has_text_style() && instruction.heading.is_none() {
                return Err(DocsError::InvalidArgument(format!(
                    "Formatting for '{}' sets no style or heading",
                    instruction.text
                )));
            }

            let ranges = locate_occurrences(&spans, &instruction.text);
            if ranges.is_empty() {
                return Err(DocsError::TextNotFound(instruction.text.clone()));
            }
            requests.extend(style_requests(instruction, &ranges)?);
        }

        if !requests.is_empty() {
            self.client.batch_update(&document_id, &requests).await?;
        }

        Ok(requests.len())
    }

    /// Replaces a markdown table already present in the document with a
    /// native table.
    pub async fn convert_to_table(
        &self,
        document_id: &str,
        table_text: &str,
    ) -> Result<TableConversion, DocsError> {
        let grid = parse_markdown_table(table_text)?;
        let document_id = normalize_document_id(document_id)?;

        let document = self.client.get_document(&document_id).await?;
        let source = locate_table_source(&flatten_spans(&document), table_text)
            .ok_or(DocsError::TableNotFound)?;

        self.client
            .batch_update(&document_id, &table_insertion_requests(&grid, source))
            .await?;

        let refreshed = self.client.get_document(&document_id).await?;
        let columns = grid.column_count();

        let (mut requests, table_start, placement) =
            match structural_cell_offsets(&refreshed, source.start) {
                Some(layout) => (
                    cell_text_requests(&grid, columns, |row, column| {
                        layout.cell_offset(row, column)
                    }),
                    layout.start,
                    CellPlacement::Structural,
                ),
                None => (
                    cell_text_requests(&grid, columns, |row, column| {
                        Some(estimated_cell_offset(source.start, row, column))
                    }),
                    estimated_table_start(source.start),
                    CellPlacement::Estimated,
                ),
            };
        let cells_written = requests.len();

        // Cell inserts land after the table start, so the header styling can
        // follow them in the same batch.
        requests.extend(header_row_requests(table_start, columns as u32));
        self.client.batch_update(&document_id, &requests).await?;

        Ok(TableConversion {
            rows: grid.row_count(),
            columns,
            cells_written,
            ragged_rows: grid.rows.iter().filter(|row| row.len() > columns).count(),
            placement,
        })
    }

    /// Title and plain text of a document.
    pub async fn read_document(&self, document_id: &str) -> Result<(String, String), DocsError> {
        let document_id = normalize_document_id(document_id)?;
        let document = self.client.get_document(&document_id).await?;
        Ok((document.title.clone(), plain_text(&document)))
    }

    pub async fn list_documents(&self) -> Result<Vec<DriveFile>, DocsError> {
        self.client.list_documents(LIST_LIMIT).await
    }
}

// ============================================================================
// TESTS
// ============================================================================
