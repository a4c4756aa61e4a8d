//! ccswitch core - profile store, settings merge, and Codex config editing
//!
//! This crate owns the state-management logic behind the `ccswitch` CLI:
//! named connection profiles for Claude Code, the merge of template and live
//! settings, and surgical edits to the Codex `config.toml` provider table.
//! It never prints; the CLI crate renders results.
//!
//! Single interactive session is assumed: no file locking is taken between
//! read and write, so a concurrent external editor is an accepted race.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod backup;
pub mod codex;
pub mod error;
pub mod ops;
pub mod paths;
pub mod profile;
pub mod proxy;
pub mod settings;
pub mod slug;
pub mod util;

pub use error::{CoreError, CoreResult};
pub use ops::OperationOutcome;
pub use profile::{AuthType, Profile, ProfileStore};
