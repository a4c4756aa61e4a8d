//! MCP service-table reconciliation
//!
//! `[mcp_servers.<id>]` sections fall in two groups: tool-managed entries
//! (a fixed id list this tool may add, update, or remove) and user-authored
//! entries, which are never touched, reordered, or dropped. Reconciliation
//! is a union-style merge: managed entries the user did not explicitly
//! deselect stay in place even when not re-selected in the current run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::CoreResult;

use super::providers::{render_section, CodexConfig};

const SERVICE_TABLE: &str = "mcp_servers";

/// Env key injected on Windows so stdio servers can spawn shells
const SYSTEM_ROOT_KEY: &str = "SYSTEMROOT";

/// Ids this tool manages; anything else in the service table is
/// user-authored and off limits
pub const MANAGED_SERVICE_IDS: &[&str] = &["context7", "mcp-deepwiki", "playwright", "exa"];

/// One tool-managed service entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McpService {
    pub id: String,
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ServiceBody {
    #[serde(default)]
    command: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    env: BTreeMap<String, String>,
}

fn is_managed(id: &str) -> bool {
    MANAGED_SERVICE_IDS.contains(&id)
}

impl CodexConfig {
    /// Union-merge selected managed services into the service table
    ///
    /// Selected entries are added or replaced. Ids in `removals` are dropped
    /// only if tool-managed; a managed entry neither selected nor removed is
    /// preserved as-is, and user-authored sections are never touched. On
    /// Windows the system-root env key is injected into every service entry
    /// before writing.
    ///
    /// # Errors
    /// `Io` on write failure.
    pub fn reconcile_services(
        &mut self,
        selected: &[McpService],
        removals: &[String],
    ) -> CoreResult<Option<PathBuf>> {
        let mut changed = false;

        for id in removals {
            if !is_managed(id) {
                log::warn!("refusing to remove user-authored service '{id}'");
                continue;
            }
            changed |= self
                .doc_mut()
                .remove_subtree(&format!("{SERVICE_TABLE}.{id}"));
        }

        for service in selected {
            let body = ServiceBody {
                command: service.command.clone(),
                args: service.args.clone(),
                env: service.env.clone(),
            };
            let rendered = render_section(&[SERVICE_TABLE, &service.id], &body)?;
            let section = format!("{SERVICE_TABLE}.{}", service.id);
            if self.doc().subtree_text(&section).as_deref() != Some(rendered.as_str()) {
                self.doc_mut().replace_subtree(&section, &rendered);
                changed = true;
            }
        }

        #[cfg(windows)]
        {
            changed |= self.augment_system_root();
        }

        if !changed {
            return Ok(None);
        }
        self.save()
    }

    /// Inject the system-root env key into every service entry's env map
    ///
    /// Applies to user-authored entries too; other env keys are not
    /// disturbed. Returns whether the document changed.
    pub fn augment_system_root(&mut self) -> bool {
        let system_root =
            std::env::var(SYSTEM_ROOT_KEY).unwrap_or_else(|_| "C:\\Windows".to_string());
        let assignment = format!("{SYSTEM_ROOT_KEY} = \"{}\"\n", system_root.replace('\\', "\\\\"));

        let mut changed = false;
        for id in self.doc().child_ids(SERVICE_TABLE) {
            let service_section = format!("{SERVICE_TABLE}.{id}");
            let env_section = format!("{service_section}.env");

            if self.doc().has_section(&env_section) {
                changed |= self.doc_mut().map_section_text(&env_section, |text| {
                    inject_into_env_section(text, &assignment)
                });
            } else if section_has_inline_env(self.doc().subtree_text(&service_section).as_deref()) {
                changed |= self.doc_mut().map_section_text(&service_section, |text| {
                    inject_into_inline_env(text, &system_root)
                });
            } else {
                let new_section = format!("[{env_section}]\n{assignment}");
                changed |= self
                    .doc_mut()
                    .insert_after_subtree(&service_section, &new_section);
            }
        }
        changed
    }
}

fn section_has_inline_env(subtree: Option<&str>) -> bool {
    subtree.is_some_and(|text| {
        text.lines()
            .any(|line| line.trim_start().starts_with("env") && line.contains('{'))
    })
}

/// Append the assignment at the end of an `[...env]` section unless the key
/// is already present
fn inject_into_env_section(text: &str, assignment: &str) -> String {
    if has_key(text, SYSTEM_ROOT_KEY) {
        return text.to_string();
    }
    // Insert after the last non-blank line so trailing separation survives.
    let content_len = text.trim_end_matches('\n').len();
    let trailing = &text[content_len..];
    let mut result = String::with_capacity(text.len() + assignment.len());
    result.push_str(&text[..content_len]);
    result.push('\n');
    result.push_str(assignment);
    if trailing.len() > 1 {
        result.push_str(&trailing[1..]);
    }
    result
}

/// Patch a single-line inline table: `env = { A = "1" }`
fn inject_into_inline_env(text: &str, system_root: &str) -> String {
    let mut result = String::with_capacity(text.len() + 32);
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if trimmed.starts_with("env")
            && line.contains('{')
            && !line.contains(SYSTEM_ROOT_KEY)
        {
            if let Some(close) = line.rfind('}') {
                let (head, tail) = line.split_at(close);
                let empty = head
                    .split_once('{')
                    .map_or(true, |(_, inner)| inner.trim().is_empty());
                let separator = if empty { " " } else { ", " };
                let escaped = system_root.replace('\\', "\\\\");
                result.push_str(head.trim_end());
                result.push_str(&format!(
                    "{separator}{SYSTEM_ROOT_KEY} = \"{escaped}\" {tail}"
                ));
                continue;
            }
        }
        result.push_str(line);
    }
    result
}

fn has_key(text: &str, key: &str) -> bool {
    text.lines().any(|line| {
        let trimmed = line.trim_start();
        !trimmed.starts_with('#')
            && trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
    })
}
