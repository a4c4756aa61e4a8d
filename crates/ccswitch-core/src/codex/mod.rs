//! Codex `config.toml` editing
//!
//! The config file is edited at text level: a section index is built over
//! the raw document and only the byte ranges of recognized, owned sections
//! are spliced. The file is never decoded and re-encoded as a whole, so
//! hand-authored sections keep their bytes, order, and comments.

pub mod doc;
pub mod providers;
pub mod services;

pub use doc::SectionDoc;
pub use providers::{CodexConfig, ProviderEntry};
pub use services::McpService;
