// Entry point of the Google Docs tool server.
//
// **Architecture Overview:**
// - `core/` = Document editing logic (no I/O, no Google types)
// - `infra/` = Implementations of core traits (Google auth, Docs/Drive REST)
// - `mcp/` = Tool surface adapters (rmcp server over stdio)
//
// This file loads configuration, wires the Google client into the docs
// service and serves requests on stdin/stdout until the input closes.

#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "mcp/mcp_layer.rs"]
mod mcp;

use crate::core::docs::DocsService;
use crate::infra::google::{token_source_from_env, GoogleDocsClient};
use crate::mcp::{DocsServer, DocsToolHandler};
use rmcp::ServiceExt;

/// Builds the handler from the configured credentials. A failure is logged
/// and leaves the server running without a client, so every tool call
/// reports the missing configuration instead of the process exiting.
async fn build_handler() -> DocsToolHandler<GoogleDocsClient> {
    let auth = match token_source_from_env().await {
        Ok(auth) => auth,
        Err(e) => {
            tracing::error!("Google credentials unavailable: {}", e);
            return DocsToolHandler::uninitialized();
        }
    };

    match GoogleDocsClient::new(auth) {
        Ok(client) => {
            let auth_kind = client.auth_kind();
            tracing::info!("Google Docs client ready ({} credentials)", auth_kind);
            DocsToolHandler::new(DocsService::new(client), auth_kind)
        }
        Err(e) => {
            tracing::error!("Failed to create Google Docs client: {}", e);
            DocsToolHandler::uninitialized()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries protocol traffic, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    dotenv::dotenv().ok();

    let service = DocsServer::new(build_handler().await)
        .serve(rmcp::transport::stdio())
        .await?;
    tracing::info!("Serving tools on stdio");
    service.waiting().await?;
    Ok(())
}
