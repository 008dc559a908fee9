// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "docs/mod.rs"]
pub mod docs;
