// =============================================================================
// MCP SERVER
// =============================================================================
//
// Plugs a `ToolCallHandler` into rmcp's `ServerHandler`. rmcp owns the
// protocol: framing, initialization, request ids and error encoding. This
// file only maps its requests onto the handler and back.
//
// Catalog entries already serialize to the MCP wire shape, so rmcp's model
// types are decoded from that JSON instead of being assembled field by field.

use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, GetPromptRequestParam, GetPromptResult,
    Implementation, ListPromptsResult, ListResourcesResult, ListToolsResult,
    PaginatedRequestParam, ReadResourceRequestParam, ReadResourceResult, ServerCapabilities,
    ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};

use super::tool_handler::ToolCallHandler;

pub const SERVER_NAME: &str = "docugen-docs";

const INSTRUCTIONS: &str = "Tools for creating, editing, formatting and deleting Google Docs. \
Document ids may be given as bare ids or full document URLs. Use convert_to_table on a markdown \
table that already exists in the document.";

fn from_wire<T: DeserializeOwned>(value: Value) -> Result<T, McpError> {
    serde_json::from_value(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

fn to_wire<T: Serialize>(items: Vec<T>) -> Result<Value, McpError> {
    serde_json::to_value(items).map_err(|e| McpError::internal_error(e.to_string(), None))
}

fn resource_mime_type(uri: &str) -> &'static str {
    if uri.starts_with("config://") {
        "application/json"
    } else {
        "text/plain"
    }
}

/// Handler result as a tool result. Failures stay results, flagged `isError`.
pub fn tool_call_result(outcome: Result<String, String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(text) => CallToolResult::error(vec![Content::text(text)]),
    }
}

fn server_implementation() -> Implementation {
    from_wire(json!({ "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") }))
        .unwrap_or_else(|_| Implementation::from_build_env())
}

pub struct DocsServer<H: ToolCallHandler> {
    handler: H,
}

impl<H: ToolCallHandler + 'static> DocsServer<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn tool_list(&self) -> Result<ListToolsResult, McpError> {
        from_wire(json!({ "tools": to_wire(self.handler.tools())? }))
    }

    pub fn resource_list(&self) -> Result<ListResourcesResult, McpError> {
        from_wire(json!({ "resources": to_wire(self.handler.resources())? }))
    }

    pub fn prompt_list(&self) -> Result<ListPromptsResult, McpError> {
        from_wire(json!({ "prompts": to_wire(self.handler.prompts())? }))
    }

    pub async fn call(&self, name: &str, arguments: Option<Map<String, Value>>) -> CallToolResult {
        tracing::info!("Tool call: {}", name);
        let args = Value::Object(arguments.unwrap_or_default());
        tool_call_result(self.handler.handle_tool_call(name, &args).await)
    }

    pub async fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let text = self
            .handler
            .read_resource(uri)
            .await
            .map_err(|message| McpError::resource_not_found(message, None))?;

        from_wire(json!({ "contents": [{
            "uri": uri,
            "mimeType": resource_mime_type(uri),
            "text": text,
        }]}))
    }

    pub fn prompt(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<GetPromptResult, McpError> {
        let text = self
            .handler
            .get_prompt(name, &arguments.unwrap_or_default())
            .map_err(|message| McpError::invalid_params(message, None))?;
        let description = self
            .handler
            .prompts()
            .into_iter()
            .find(|prompt| prompt.name == name)
            .map(|prompt| prompt.description);

        from_wire(json!({
            "description": description,
            "messages": [{ "role": "user", "content": { "type": "text", "text": text } }],
        }))
    }
}

impl<H: ToolCallHandler + 'static> ServerHandler for DocsServer<H> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            server_info: server_implementation(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        self.tool_list()
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call(&request.name, request.arguments).await)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        self.resource_list()
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read(&request.uri).await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        self.prompt_list()
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.prompt(&request.name, request.arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::tool_catalog::{
        all_prompts, all_resources, all_tools, render_prompt, PromptDef, ResourceDef, ToolDef,
        DRAFT_REPORT_PROMPT, SETTINGS_URI,
    };
    use async_trait::async_trait;
    use rmcp::model::{PromptMessageContent, ResourceContents};

    struct EchoHandler;

    #[async_trait]
    impl ToolCallHandler for EchoHandler {
        async fn handle_tool_call(&self, name: &str, args: &Value) -> Result<String, String> {
            match name {
                "echo" => Ok(args["text"].as_str().unwrap_or_default().to_string()),
                _ => Err(format!("Unknown tool: {}", name)),
            }
        }

        async fn read_resource(&self, uri: &str) -> Result<String, String> {
            match uri {
                SETTINGS_URI => Ok("{}".to_string()),
                _ => Err(format!("Unknown resource: {}", uri)),
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

    fn server() -> DocsServer<EchoHandler> {
        DocsServer::new(EchoHandler)
    }

    fn object(value: Value) -> Option<Map<String, Value>> {
        value.as_object().cloned()
    }

    fn text_of(result: &CallToolResult) -> String {
        serde_json::to_value(result).unwrap()["content"][0]["text"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_server_info_advertises_capabilities() {
        let info = server().get_info();

        assert_eq!(info.server_info.name, SERVER_NAME);
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
        assert!(info.capabilities.prompts.is_some());
        assert!(info.instructions.unwrap().contains("convert_to_table"));
    }

    #[test]
    fn test_catalog_decodes_into_protocol_types() {
        let server = server();

        let tools = server.tool_list().unwrap();
        assert_eq!(tools.tools.len(), all_tools().len());
        assert_eq!(tools.tools[0].name, "create_doc");
        assert_eq!(tools.tools[0].input_schema["type"], "object");

        let resources = server.resource_list().unwrap();
        assert_eq!(resources.resources.len(), 2);
        assert_eq!(resources.resources[1].raw.uri, SETTINGS_URI);

        let prompts = server.prompt_list().unwrap();
        assert_eq!(prompts.prompts[0].name, DRAFT_REPORT_PROMPT);
    }

    #[tokio::test]
    async fn test_tool_failures_are_flagged_results() {
        let server = server();

        let ok = server.call("echo", object(json!({ "text": "hi" }))).await;
        assert_eq!(ok.is_error, Some(false));
        assert_eq!(text_of(&ok), "hi");

        let failed = server.call("nope", None).await;
        assert_eq!(failed.is_error, Some(true));
        assert_eq!(text_of(&failed), "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_read_resource() {
        let server = server();

        let result = server.read(SETTINGS_URI).await.unwrap();
        match &result.contents[0] {
            ResourceContents::TextResourceContents {
                uri, mime_type, text, ..
            } => {
                assert_eq!(uri, SETTINGS_URI);
                assert_eq!(mime_type.as_deref(), Some("application/json"));
                assert_eq!(text, "{}");
            }
            other => panic!("unexpected contents: {:?}", other),
        }

        assert!(server.read("x://y").await.is_err());
    }

    #[test]
    fn test_get_prompt() {
        let server = server();

        let result = server
            .prompt(DRAFT_REPORT_PROMPT, object(json!({ "topic": "Onboarding" })))
            .unwrap();
        assert!(result.description.is_some());
        assert_eq!(result.messages.len(), 1);
        match &result.messages[0].content {
            PromptMessageContent::Text { text } => assert!(text.contains("Onboarding Report")),
            other => panic!("unexpected content: {:?}", other),
        }

        assert!(server.prompt(DRAFT_REPORT_PROMPT, None).is_err());
        assert!(server.prompt("missing", None).is_err());
    }
}
