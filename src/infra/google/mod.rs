// Google infra layer.
// - `auth.rs` turns configured credentials into bearer tokens.
// - `docs_client.rs` talks to the Docs and Drive HTTP APIs.

pub mod auth;
pub mod docs_client;

pub use auth::token_source_from_env;
pub use docs_client::GoogleDocsClient;
