//! Provider table operations on the Codex config
//!
//! Providers live in `[model_providers.<id>]` sections; the active provider
//! is the top-level `model_provider` scalar. All writes splice only the
//! owned bytes and go through the standard backup-then-atomic-write path.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

use super::doc::SectionDoc;

/// Top-level scalar naming the active provider
pub const ACTIVE_PROVIDER_KEY: &str = "model_provider";

const PROVIDER_TABLE: &str = "model_providers";

/// One entry in the provider table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry {
    /// Section id (`model_providers.<id>`)
    pub id: String,
    /// Human-facing name
    pub display_name: String,
    /// Endpoint base URL
    pub base_url: String,
    /// Wire protocol (`responses` or `chat`)
    pub wire_protocol: String,
    /// Name of the env var carrying this provider's credential
    pub credential_env_var: String,
    /// Whether the entry still authenticates through the official login
    pub requires_special_auth: bool,
}

/// On-disk field names within a provider section. Unknown fields inside a
/// section are ignored on read and untouched unless the section is rewritten.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ProviderBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    base_url: String,
    #[serde(default)]
    wire_api: String,
    #[serde(default)]
    env_key: String,
    #[serde(default)]
    requires_openai_auth: bool,
}

impl ProviderBody {
    fn into_entry(self, id: String) -> ProviderEntry {
        ProviderEntry {
            id,
            display_name: self.name,
            base_url: self.base_url,
            wire_protocol: self.wire_api,
            credential_env_var: self.env_key,
            requires_special_auth: self.requires_openai_auth,
        }
    }

    fn from_entry(entry: &ProviderEntry) -> Self {
        Self {
            name: entry.display_name.clone(),
            base_url: entry.base_url.clone(),
            wire_api: entry.wire_protocol.clone(),
            env_key: entry.credential_env_var.clone(),
            requires_openai_auth: entry.requires_special_auth,
        }
    }
}

/// The Codex configuration file, edited in place
#[derive(Debug)]
pub struct CodexConfig {
    path: PathBuf,
    doc: SectionDoc,
}

impl CodexConfig {
    /// Open the config; a missing file reads as empty
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read.
    pub fn open(path: &Path) -> CoreResult<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            doc: SectionDoc::load(path)?,
        })
    }

    /// The raw document (tests and diagnostics)
    #[must_use]
    pub fn doc(&self) -> &SectionDoc {
        &self.doc
    }

    /// Mutable access for service reconciliation
    pub(crate) fn doc_mut(&mut self) -> &mut SectionDoc {
        &mut self.doc
    }

    pub(crate) fn save(&self) -> CoreResult<Option<PathBuf>> {
        self.doc.save(&self.path)
    }

    /// Active provider id; `None` when absent or commented out (official)
    #[must_use]
    pub fn active_provider_id(&self) -> Option<String> {
        self.doc.scalar(ACTIVE_PROVIDER_KEY)
    }

    /// All provider entries, in document order
    ///
    /// # Errors
    /// Returns an error if a provider section is not parseable TOML.
    pub fn list_providers(&self) -> CoreResult<Vec<ProviderEntry>> {
        let mut providers = Vec::new();
        for id in self.doc.child_ids(PROVIDER_TABLE) {
            if let Some(entry) = self.get_provider(&id)? {
                providers.push(entry);
            }
        }
        Ok(providers)
    }

    /// Parse one provider entry by id
    ///
    /// # Errors
    /// Returns an error if the section exists but is not parseable TOML.
    pub fn get_provider(&self, id: &str) -> CoreResult<Option<ProviderEntry>> {
        let section = format!("{PROVIDER_TABLE}.{id}");
        let Some(text) = self.doc.subtree_text(&section) else {
            return Ok(None);
        };
        let table: toml::Table = text.parse().map_err(|e: toml::de::Error| {
            CoreError::TomlParse {
                section: section.clone(),
                message: e.to_string(),
            }
        })?;
        let body = table
            .get(PROVIDER_TABLE)
            .and_then(|t| t.get(id))
            .cloned()
            .ok_or_else(|| CoreError::TomlParse {
                section: section.clone(),
                message: "section body missing after parse".to_string(),
            })?;
        let body: ProviderBody =
            body.try_into().map_err(|e: toml::de::Error| CoreError::TomlParse {
                section,
                message: e.to_string(),
            })?;
        Ok(Some(body.into_entry(id.to_string())))
    }

    /// Point the active-provider scalar at an existing entry
    ///
    /// Fails closed: with an unknown id the file is left byte-identical.
    ///
    /// # Errors
    /// `NotFound` for an unknown provider id, `Io` on write failure.
    pub fn switch_provider(&mut self, id: &str) -> CoreResult<Option<PathBuf>> {
        if !self.doc.has_section(&format!("{PROVIDER_TABLE}.{id}")) {
            return Err(CoreError::NotFound(format!("provider '{id}'")));
        }
        self.doc.set_scalar(ACTIVE_PROVIDER_KEY, id);
        self.save()
    }

    /// Remove the active-provider scalar (official mode); no-op when absent
    ///
    /// # Errors
    /// `Io` on write failure.
    pub fn switch_to_official(&mut self) -> CoreResult<Option<PathBuf>> {
        if !self.doc.remove_scalar(ACTIVE_PROVIDER_KEY) {
            return Ok(None);
        }
        self.save()
    }

    /// Add or replace a provider section
    ///
    /// # Errors
    /// `Validation` for an empty id, `Io` on write failure.
    pub fn upsert_provider(&mut self, entry: &ProviderEntry) -> CoreResult<Option<PathBuf>> {
        if entry.id.trim().is_empty() {
            return Err(CoreError::Validation("provider id is empty".to_string()));
        }
        let rendered = render_section(
            &[PROVIDER_TABLE, &entry.id],
            &ProviderBody::from_entry(entry),
        )?;
        self.doc
            .replace_subtree(&format!("{PROVIDER_TABLE}.{}", entry.id), &rendered);
        log::debug!("upserted provider '{}'", entry.id);
        self.save()
    }

    /// Remove a provider section; clears the active pointer if it pointed
    /// at the removed entry
    ///
    /// # Errors
    /// `NotFound` for an unknown provider id, `Io` on write failure.
    pub fn remove_provider(&mut self, id: &str) -> CoreResult<Option<PathBuf>> {
        if !self.doc.remove_subtree(&format!("{PROVIDER_TABLE}.{id}")) {
            return Err(CoreError::NotFound(format!("provider '{id}'")));
        }
        if self.active_provider_id().as_deref() == Some(id) {
            self.doc.remove_scalar(ACTIVE_PROVIDER_KEY);
        }
        self.save()
    }
}

/// Render a section (with dotted header) by serializing through a nested
/// wrapper table, so the TOML serializer emits absolute headers.
pub(crate) fn render_section<T: Serialize>(path: &[&str], body: &T) -> CoreResult<String> {
    let mut value = toml::Value::try_from(body).map_err(|e| CoreError::TomlParse {
        section: path.join("."),
        message: e.to_string(),
    })?;
    for component in path.iter().rev() {
        let mut table = toml::Table::new();
        table.insert((*component).to_string(), value);
        value = toml::Value::Table(table);
    }
    toml::to_string(&value).map_err(|e| CoreError::TomlParse {
        section: path.join("."),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_section_emits_dotted_header() {
        let body = ProviderBody {
            name: "OpenRouter".to_string(),
            base_url: "https://openrouter.ai/api/v1".to_string(),
            wire_api: "chat".to_string(),
            env_key: "OPENROUTER_API_KEY".to_string(),
            requires_openai_auth: false,
        };
        let text = render_section(&["model_providers", "openrouter"], &body).expect("render");
        assert!(text.starts_with("[model_providers.openrouter]\n"));
        assert!(text.contains("name = \"OpenRouter\""));
        assert!(text.contains("wire_api = \"chat\""));
    }
}
