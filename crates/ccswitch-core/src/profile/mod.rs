//! Named connection profiles for Claude Code
//!
//! The store owns the id -> profile map and the single current-selection
//! pointer, persisted as one JSON document.

pub mod migrate;
pub mod store;
pub mod types;

pub use store::{Mutation, ProfileStore};
pub use types::{AuthType, Profile, ProfileUpdate, StoreData};
