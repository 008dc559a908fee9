// Tool surface - rmcp server wiring, tool declarations and dispatch.

pub mod server;
pub mod tool_catalog;
pub mod tool_handler;

pub use server::DocsServer;
pub use tool_handler::DocsToolHandler;
