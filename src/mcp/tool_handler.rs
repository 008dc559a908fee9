// =============================================================================
// DOCS TOOL HANDLER
// =============================================================================
//
// Turns tool calls and resource reads into `DocsService` operations and
// renders the outcome as text for the agent. Failures come back as `Err`
// text; the server marks tool failures with `isError`.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::tool_catalog::{
    all_prompts, all_resources, all_tools, render_prompt, PromptDef, ResourceDef, ToolDef,
    CONVERT_TO_TABLE, CREATE_DOC, DELETE_DOC, DOCS_LIST_URI, FORMAT_DOC, READ_DOC, SETTINGS_URI,
    UPDATE_DOC,
};
use crate::core::docs::{
    normalize_document_id, CellPlacement, DocsApi, DocsError, DocsService, DriveApi, DriveFile,
    FormatInstruction, UpdateMode, LIST_LIMIT,
};

/// What the server needs from whoever actually runs the tools.
#[async_trait]
pub trait ToolCallHandler: Send + Sync {
    async fn handle_tool_call(&self, name: &str, args: &Value) -> Result<String, String>;

    async fn read_resource(&self, uri: &str) -> Result<String, String>;

    fn get_prompt(&self, name: &str, args: &Map<String, Value>) -> Result<String, String>;

    fn tools(&self) -> Vec<ToolDef>;

    fn resources(&self) -> Vec<ResourceDef>;

    fn prompts(&self) -> Vec<PromptDef>;
}

#[derive(Debug, Deserialize)]
struct CreateDocArgs {
    title: String,
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateDocArgs {
    document_id: String,
    content: String,
    #[serde(default)]
    mode: UpdateMode,
}

#[derive(Debug, Deserialize)]
struct DocumentArgs {
    document_id: String,
}

#[derive(Debug, Deserialize)]
struct FormatDocArgs {
    document_id: String,
    formats: Vec<FormatInstruction>,
}

#[derive(Debug, Deserialize)]
struct ConvertToTableArgs {
    document_id: String,
    table_text: String,
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: &Value) -> Result<T, String> {
    serde_json::from_value(args.clone())
        .map_err(|e| format!("Invalid arguments for {}: {}", tool, e))
}

/// Listing text for the `docs://list` resource.
pub fn format_document_list(files: &[DriveFile]) -> String {
    if files.is_empty() {
        return "No Google Docs found.".to_string();
    }

    let mut output = format!("Recent Google Docs ({}):\n\n", files.len());
    for file in files {
        let modified = file
            .modified_time
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        output.push_str(&format!(
            "- {} (ID: {}), modified {}\n",
            file.name, file.id, modified
        ));
    }
    output
}

pub struct DocsToolHandler<C: DocsApi + DriveApi> {
    service: Option<DocsService<C>>,
    auth_kind: Option<&'static str>,
}

impl<C: DocsApi + DriveApi> DocsToolHandler<C> {
    pub fn new(service: DocsService<C>, auth_kind: &'static str) -> Self {
        Self {
            service: Some(service),
            auth_kind: Some(auth_kind),
        }
    }

    /// Handler for a server whose Google client could not be set up. Every
    /// tool call reports the missing client.
    pub fn uninitialized() -> Self {
        Self {
            service: None,
            auth_kind: None,
        }
    }

    fn service(&self) -> Result<&DocsService<C>, DocsError> {
        self.service.as_ref().ok_or(DocsError::ClientNotInitialized)
    }

    async fn create_doc(&self, args: CreateDocArgs) -> Result<String, DocsError> {
        let created = self
            .service()?
            .create_document(&args.title, args.content.as_deref())
            .await?;

        tracing::info!("Created Google Doc '{}' ({})", created.title, created.document_id);
        Ok(format!(
            "Created document '{}' with ID: {}\nURL: {}",
            created.title,
            created.document_id,
            created.url()
        ))
    }

    async fn update_doc(&self, args: UpdateDocArgs) -> Result<String, DocsError> {
        self.service()?
            .update_document(&args.document_id, &args.content, args.mode)
            .await?;

        tracing::info!("Updated Google Doc {} ({:?})", args.document_id, args.mode);
        Ok(format!(
            "Successfully {} content in document {}",
            args.mode, args.document_id
        ))
    }

    async fn delete_doc(&self, args: DocumentArgs) -> Result<String, DocsError> {
        self.service()?.delete_document(&args.document_id).await?;

        tracing::info!("Deleted Google Doc {}", args.document_id);
        Ok(format!("Deleted document {}", args.document_id))
    }

    async fn format_doc(&self, args: FormatDocArgs) -> Result<String, DocsError> {
        let sent = self
            .service()?
            .format_document(&args.document_id, &args.formats)
            .await?;

        tracing::info!(
            "Applied {} formatting request(s) to Google Doc {}",
            sent,
            args.document_id
        );
        Ok(format!(
            "Applied {} formatting instruction(s) ({} request(s)) to document {}",
            args.formats.len(),
            sent,
            args.document_id
        ))
    }

    async fn convert_to_table(&self, args: ConvertToTableArgs) -> Result<String, DocsError> {
        let conversion = self
            .service()?
            .convert_to_table(&args.document_id, &args.table_text)
            .await?;

        if conversion.placement == CellPlacement::Estimated {
            tracing::warn!(
                "Table in {} not found after insertion; cell text placed by estimated offsets",
                args.document_id
            );
        }
        if conversion.ragged_rows > 0 {
            tracing::warn!(
                "{} row(s) had more cells than the header; extra cells were skipped",
                conversion.ragged_rows
            );
        }
        tracing::info!(
            "Converted {}x{} table in Google Doc {} ({} cells written)",
            conversion.rows,
            conversion.columns,
            args.document_id,
            conversion.cells_written
        );

        Ok(format!(
            "Converted table with {} rows × {} columns in document {}",
            conversion.rows, conversion.columns, args.document_id
        ))
    }

    async fn read_doc(&self, args: DocumentArgs) -> Result<String, DocsError> {
        let (title, text) = self.service()?.read_document(&args.document_id).await?;
        Ok(format!("# {}\n\n{}", title, text))
    }

    async fn list_docs(&self) -> Result<String, DocsError> {
        let files = self.service()?.list_documents().await?;
        Ok(format_document_list(&files))
    }

    fn settings(&self) -> Value {
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "apis": ["Google Docs v1", "Google Drive v3"],
            "auth": self.auth_kind,
            "client_initialized": self.service.is_some(),
            "list_limit": LIST_LIMIT,
            "tools": all_tools().into_iter().map(|t| t.name).collect::<Vec<_>>(),
            "prompts": all_prompts().into_iter().map(|p| p.name).collect::<Vec<_>>(),
        })
    }
}

#[async_trait]
impl<C: DocsApi + DriveApi> ToolCallHandler for DocsToolHandler<C> {
    async fn handle_tool_call(&self, name: &str, args: &Value) -> Result<String, String> {
        let result = match name {
            CREATE_DOC => self.create_doc(parse_args(name, args)?).await,
            UPDATE_DOC => self.update_doc(parse_args(name, args)?).await,
            DELETE_DOC => self.delete_doc(parse_args(name, args)?).await,
            FORMAT_DOC => self.format_doc(parse_args(name, args)?).await,
            CONVERT_TO_TABLE => self.convert_to_table(parse_args(name, args)?).await,
            READ_DOC => self.read_doc(parse_args(name, args)?).await,
            _ => return Err(format!("Unknown tool: {}", name)),
        };

        result.map_err(|e| {
            tracing::error!("Tool {} failed: {}", name, e);
            format!("Error: {}", e)
        })
    }

    async fn read_resource(&self, uri: &str) -> Result<String, String> {
        match uri {
            DOCS_LIST_URI => self.list_docs().await.map_err(|e| {
                tracing::error!("Listing documents failed: {}", e);
                format!("Error: {}", e)
            }),
            SETTINGS_URI => serde_json::to_string_pretty(&self.settings()).map_err(|e| e.to_string()),
            _ => {
                // Allow `docs://<id>` as a shortcut for reading one document.
                let id = uri
                    .strip_prefix("docs://")
                    .ok_or_else(|| format!("Unknown resource: {}", uri))?;
                let document_id = normalize_document_id(id).map_err(|e| e.to_string())?;
                self.read_doc(DocumentArgs { document_id })
                    .await
                    .map_err(|e| format!("Error: {}", e))
            }
        }
    }

    fn get_prompt(&self, name: &str, args: &Map<String, Value>) -> Result<String, String> {
        render_prompt(name, args)
    }

    fn tools(&self) -> Vec<ToolDef> {
        all_tools()
    }

    fn resources(&self) -> Vec<ResourceDef> {
        all_resources()
    }

    fn prompts(&self) -> Vec<PromptDef> {
        all_prompts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::docs::{Document, EditRequest};
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    // Fake that records every batch and serves a fixed snapshot.
    #[derive(Default)]
    struct RecordingGoogle {
        document: Option<Document>,
        files: Vec<DriveFile>,
        batches: Mutex<Vec<Vec<EditRequest>>>,
    }

    #[async_trait]
    impl DocsApi for RecordingGoogle {
        async fn create_document(&self, title: &str) -> Result<Document, DocsError> {
            Ok(Document {
                document_id: "created-id".to_string(),
                title: title.to_string(),
                body: None,
            })
        }

        async fn get_document(&self, document_id: &str) -> Result<Document, DocsError> {
            self.document
                .clone()
                .ok_or_else(|| DocsError::Api(format!("404: {}", document_id)))
        }

        async fn batch_update(
            &self,
            _document_id: &str,
            requests: &[EditRequest],
        ) -> Result<(), DocsError> {
            self.batches.lock().unwrap().push(requests.to_vec());
            Ok(())
        }
    }

    #[async_trait]
    impl DriveApi for RecordingGoogle {
        async fn list_documents(&self, limit: usize) -> Result<Vec<DriveFile>, DocsError> {
            Ok(self.files.iter().take(limit).cloned().collect())
        }

        async fn delete_file(&self, _file_id: &str) -> Result<(), DocsError> {
            Ok(())
        }
    }

    fn handler(google: RecordingGoogle) -> DocsToolHandler<RecordingGoogle> {
        DocsToolHandler::new(DocsService::new(google), "service_account")
    }

    fn intro_document() -> Document {
        serde_json::from_value(json!({
            "documentId": "doc-1",
            "title": "Report",
            "body": { "content": [
                {
                    "startIndex": 1, "endIndex": 7,
                    "paragraph": { "elements": [
                        { "startIndex": 1, "endIndex": 7, "textRun": { "content": "Intro\n" } }
                    ]}
                }
            ]}
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_uninitialized_client_rejects_every_tool() {
        let handler: DocsToolHandler<RecordingGoogle> = DocsToolHandler::uninitialized();

        let err = handler
            .handle_tool_call(CREATE_DOC, &json!({ "title": "Plan" }))
            .await
            .unwrap_err();
        assert!(err.contains("not initialized"));

        let err = handler.read_resource(DOCS_LIST_URI).await.unwrap_err();
        assert!(err.contains("not initialized"));
    }

    #[tokio::test]
    async fn test_unknown_tool_and_bad_arguments() {
        let handler = handler(RecordingGoogle::default());

        let err = handler.handle_tool_call("rename_doc", &json!({})).await.unwrap_err();
        assert_eq!(err, "Unknown tool: rename_doc");

        let err = handler
            .handle_tool_call(UPDATE_DOC, &json!({ "document_id": "doc-1" }))
            .await
            .unwrap_err();
        assert!(err.starts_with("Invalid arguments for update_doc"));

        let err = handler
            .handle_tool_call(
                UPDATE_DOC,
                &json!({ "document_id": "doc-1", "content": "x", "mode": "prepend" }),
            )
            .await
            .unwrap_err();
        assert!(err.starts_with("Invalid arguments for update_doc"));
    }

    #[tokio::test]
    async fn test_create_doc_message() {
        let handler = handler(RecordingGoogle::default());

        let text = handler
            .handle_tool_call(CREATE_DOC, &json!({ "title": "Plan", "content": "Hello" }))
            .await
            .unwrap();

        assert!(text.contains("Created document 'Plan' with ID: created-id"));
        assert!(text.contains("https://docs.google.com/document/d/created-id/edit"));
    }

    #[tokio::test]
    async fn test_format_doc_reports_missing_text() {
        let handler = handler(RecordingGoogle {
            document: Some(intro_document()),
            ..Default::default()
        });

        let ok = handler
            .handle_tool_call(
                FORMAT_DOC,
                &json!({ "document_id": "doc-1", "formats": [{ "text": "Intro", "bold": true }] }),
            )
            .await
            .unwrap();
        assert!(ok.contains("1 request(s)"));

        let err = handler
            .handle_tool_call(
                FORMAT_DOC,
                &json!({ "document_id": "doc-1", "formats": [{ "text": "Missing", "bold": true }] }),
            )
            .await
            .unwrap_err();
        assert_eq!(err, "Error: Text 'Missing' not found in document");
    }

    #[tokio::test]
    async fn test_convert_to_table_empty_input() {
        let handler = handler(RecordingGoogle {
            document: Some(intro_document()),
            ..Default::default()
        });

        let err = handler
            .handle_tool_call(
                CONVERT_TO_TABLE,
                &json!({ "document_id": "doc-1", "table_text": "|---|" }),
            )
            .await
            .unwrap_err();
        assert_eq!(err, "Error: No valid table data found");
    }

    #[tokio::test]
    async fn test_update_doc_default_mode_appends() {
        let handler = handler(RecordingGoogle {
            document: Some(intro_document()),
            ..Default::default()
        });

        let text = handler
            .handle_tool_call(UPDATE_DOC, &json!({ "document_id": "doc-1", "content": "More" }))
            .await
            .unwrap();

        assert_eq!(text, "Successfully appended content in document doc-1");
    }

    #[tokio::test]
    async fn test_read_resources() {
        let handler = handler(RecordingGoogle {
            document: Some(intro_document()),
            files: vec![DriveFile {
                id: "abc".to_string(),
                name: "Roadmap".to_string(),
                modified_time: Some(Utc.with_ymd_and_hms(2026, 10, 14, 9, 5, 0).unwrap()),
            }],
            ..Default::default()
        });

        let listing = handler.read_resource(DOCS_LIST_URI).await.unwrap();
        assert!(listing.contains("- Roadmap (ID: abc), modified 2026-10-14 09:05 UTC"));

        let settings: Value =
            serde_json::from_str(&handler.read_resource(SETTINGS_URI).await.unwrap()).unwrap();
        assert_eq!(settings["client_initialized"], true);
        assert_eq!(settings["auth"], "service_account");
        assert_eq!(settings["prompts"][0], "draft_report");

        let doc = handler.read_resource("docs://doc-1").await.unwrap();
        assert!(doc.starts_with("# Report\n\nIntro"));

        assert!(handler.read_resource("file:///etc/passwd").await.is_err());
    }

    #[test]
    fn test_empty_document_list() {
        assert_eq!(format_document_list(&[]), "No Google Docs found.");
    }
}
