// =============================================================================
// GOOGLE DOCS / DRIVE CLIENT
// =============================================================================
//
// Implements the core `DocsApi` and `DriveApi` traits over the REST APIs:
// - Docs v1:  documents.create, documents.get, documents.batchUpdate
// - Drive v3: files.list, files.delete
//
// Every call fetches a bearer token from the injected `TokenSource`. Non-2xx
// responses become `DocsError::Api` with the status and response body so the
// caller sees Google's own explanation (bad id, missing permission, ...).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::auth::TokenSource;
use crate::core::docs::{DocsApi, DocsError, Document, DriveApi, DriveFile, EditRequest};

const DOCS_BASE_URL: &str = "https://docs.googleapis.com/v1";
const DRIVE_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Drive query for non-trashed Google Docs.
const DOCS_QUERY: &str = "mimeType='application/vnd.google-apps.document' and trashed=false";

pub struct GoogleDocsClient {
    client: Client,
    auth: Arc<dyn TokenSource>,
    docs_base_url: String,
    drive_base_url: String,
}

impl GoogleDocsClient {
    pub fn new(auth: Arc<dyn TokenSource>) -> Result<Self, DocsError> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert(
            "User-Agent",
            HeaderValue::from_static(concat!("docugen-docs/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DocsError::Api(e.to_string()))?;

        Ok(Self {
            client,
            auth,
            docs_base_url: DOCS_BASE_URL.to_string(),
            drive_base_url: DRIVE_BASE_URL.to_string(),
        })
    }

    pub fn auth_kind(&self) -> &'static str {
        self.auth.kind()
    }

    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response, DocsError> {
        let token = self.auth.access_token().await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| DocsError::Api(format!("{}: {}", context, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DocsError::Api(format!("{} ({}): {}", context, status, text)));
        }

        Ok(response)
    }

    async fn read_document(response: Response) -> Result<Document, DocsError> {
        response
            .json()
            .await
            .map_err(|e| DocsError::Api(format!("Unexpected document response: {}", e)))
    }

    fn parse_datetime(value: Option<String>) -> Option<DateTime<Utc>> {
        value
            .as_deref()
            .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn map_file(api: ApiFile) -> Option<DriveFile> {
        Some(DriveFile {
            id: api.id?,
            name: api.name.unwrap_or_else(|| "Untitled document".to_string()),
            modified_time: Self::parse_datetime(api.modified_time),
        })
    }
}

#[async_trait]
impl DocsApi for GoogleDocsClient {
    async fn create_document(&self, title: &str) -> Result<Document, DocsError> {
        let url = format!("{}/documents", self.docs_base_url);
        tracing::debug!("Creating Google Doc '{}'", title);

        let response = self
            .send(
                self.client.post(url).json(&json!({ "title": title })),
                "Failed to create document",
            )
            .await?;
        Self::read_document(response).await
    }

    async fn get_document(&self, document_id: &str) -> Result<Document, DocsError> {
        let url = format!("{}/documents/{}", self.docs_base_url, document_id);
        tracing::debug!("Fetching Google Doc {}", document_id);

        let response = self
            .send(self.client.get(url), "Failed to fetch document")
            .await?;
        Self::read_document(response).await
    }

    async fn batch_update(
        &self,
        document_id: &str,
        requests: &[EditRequest],
    ) -> Result<(), DocsError> {
        let url = format!("{}/documents/{}:batchUpdate", self.docs_base_url, document_id);
        tracing::debug!(
            "Submitting {} request(s) to Google Doc {}",
            requests.len(),
            document_id
        );

        self.send(
            self.client.post(url).json(&json!({ "requests": requests })),
            "Batch update failed",
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl DriveApi for GoogleDocsClient {
    async fn list_documents(&self, limit: usize) -> Result<Vec<DriveFile>, DocsError> {
        let url = format!("{}/files", self.drive_base_url);
        let page_size = limit.to_string();
        let request = self.client.get(url).query(&[
            ("q", DOCS_QUERY),
            ("orderBy", "modifiedTime desc"),
            ("pageSize", page_size.as_str()),
            ("fields", "files(id,name,modifiedTime)"),
        ]);

        let response = self.send(request, "Failed to list documents").await?;
        let list: ApiFileList = response
            .json()
            .await
            .map_err(|e| DocsError::Api(format!("Unexpected file list response: {}", e)))?;

        Ok(list.files.into_iter().filter_map(Self::map_file).collect())
    }

    async fn delete_file(&self, file_id: &str) -> Result<(), DocsError> {
        let url = format!("{}/files/{}", self.drive_base_url, file_id);
        tracing::debug!("Deleting Drive file {}", file_id);

        self.send(self.client.delete(url), "Failed to delete document")
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiFileList {
    #[serde(default)]
    files: Vec<ApiFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiFile {
    id: Option<String>,
    name: Option<String>,
    modified_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_list_parsing() {
        let list: ApiFileList = serde_json::from_str(
            r#"{"files": [
                {"id": "1", "name": "Plan", "modifiedTime": "2026-10-01T12:30:00.000Z"},
                {"name": "No id"},
                {"id": "2"}
            ]}"#,
        )
        .unwrap();

        let files: Vec<DriveFile> = list
            .files
            .into_iter()
            .filter_map(GoogleDocsClient::map_file)
            .collect();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "Plan");
        assert_eq!(
            files[0].modified_time,
            Some(Utc.with_ymd_and_hms(2026, 10, 1, 12, 30, 0).unwrap())
        );
        assert_eq!(files[1].name, "Untitled document");
        assert_eq!(files[1].modified_time, None);
    }

    #[test]
    fn test_empty_file_list() {
        let list: ApiFileList = serde_json::from_str("{}").unwrap();
        assert!(list.files.is_empty());
    }

    #[test]
    fn test_batch_body_shape() {
        let requests = vec![EditRequest::insert_text(1, "Hello")];
        let body = json!({ "requests": requests });
        assert_eq!(
            body,
            json!({ "requests": [
                { "insertText": { "location": { "index": 1 }, "text": "Hello" } }
            ]})
        );
    }
}
