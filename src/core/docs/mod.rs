// Google Docs tooling core.
//
// Leaves first: the document adapter and markdown parser feed the locator,
// the locator feeds the request builders, and the service strings them
// together against the `DocsApi` / `DriveApi` traits.

pub mod cell_offsets;
pub mod document_adapter;
pub mod document_models;
pub mod docs_service;
pub mod edit_requests;
pub mod markdown_table;
pub mod occurrence_locator;

pub use docs_service::{normalize_document_id, DocsApi, DocsError, DocsService, DriveApi, LIST_LIMIT};
pub use document_models::{CellPlacement, Document, DriveFile, FormatInstruction, UpdateMode};
pub use edit_requests::EditRequest;
