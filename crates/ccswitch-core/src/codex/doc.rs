//! Line/section index over raw TOML text
//!
//! `SectionDoc` knows just enough TOML to find `[dotted.section]` headers
//! and top-level scalar assignments in the preamble. Edits splice byte
//! ranges; every byte outside the targeted range is left untouched.

use std::fs;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// A parsed header span: the section's header line plus its body, up to the
/// next header or end of file.
#[derive(Debug, Clone)]
struct Span {
    name: String,
    start: usize,
    end: usize,
}

/// Raw structured-text document with a recomputed-section index
#[derive(Debug, Clone, Default)]
pub struct SectionDoc {
    text: String,
}

impl SectionDoc {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing text
    #[must_use]
    pub fn from_text(text: String) -> Self {
        Self { text }
    }

    /// Load from a file; a missing file yields an empty document
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = fs::read_to_string(path).map_err(|e| CoreError::io(path, &e))?;
        Ok(Self { text })
    }

    /// The raw document text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the document has no content
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    // ------------------------------------------------------------------
    // Section index
    // ------------------------------------------------------------------

    fn spans(&self) -> Vec<Span> {
        let mut spans: Vec<Span> = Vec::new();
        let mut offset = 0;

        for line in self.text.split_inclusive('\n') {
            if let Some(name) = parse_header(line) {
                if let Some(last) = spans.last_mut() {
                    last.end = offset;
                }
                spans.push(Span {
                    name,
                    start: offset,
                    end: self.text.len(),
                });
            }
            offset += line.len();
        }
        // split_inclusive drops nothing, but a file not ending in a newline
        // still ends its last span at text.len(), which is already set.
        spans
    }

    fn preamble_end(&self) -> usize {
        self.spans().first().map_or(self.text.len(), |s| s.start)
    }

    fn subtree_spans(&self, name: &str) -> Vec<Span> {
        let prefix = format!("{name}.");
        self.spans()
            .into_iter()
            .filter(|s| s.name == name || s.name.starts_with(&prefix))
            .collect()
    }

    /// Whether a section with exactly this dotted name exists
    #[must_use]
    pub fn has_section(&self, name: &str) -> bool {
        self.spans().iter().any(|s| s.name == name)
    }

    /// Distinct direct child ids under a parent table, in document order
    #[must_use]
    pub fn child_ids(&self, parent: &str) -> Vec<String> {
        let prefix = format!("{parent}.");
        let mut ids: Vec<String> = Vec::new();
        for span in self.spans() {
            if let Some(rest) = span.name.strip_prefix(&prefix) {
                let child = rest.split('.').next().unwrap_or(rest).to_string();
                if !ids.contains(&child) {
                    ids.push(child);
                }
            }
        }
        ids
    }

    /// Concatenated text of a section and all its subsections
    #[must_use]
    pub fn subtree_text(&self, name: &str) -> Option<String> {
        let spans = self.subtree_spans(name);
        if spans.is_empty() {
            return None;
        }
        let mut text = String::new();
        for span in spans {
            text.push_str(&self.text[span.start..span.end]);
        }
        Some(text)
    }

    /// Replace a section and its subsections with new text, or append the
    /// text at the end of the document when the section does not exist
    pub fn replace_subtree(&mut self, name: &str, new_text: &str) {
        let spans = self.subtree_spans(name);
        let mut replacement = ensure_trailing_newline(new_text);

        if spans.is_empty() {
            if !self.text.is_empty() && !self.text.ends_with("\n\n") {
                if !self.text.ends_with('\n') {
                    self.text.push('\n');
                }
                self.text.push('\n');
            }
            self.text.push_str(&replacement);
            return;
        }

        // Preserve the blank-line separation the old subtree carried.
        let last = &spans[spans.len() - 1];
        if self.text[last.start..last.end].ends_with("\n\n") {
            replacement.push('\n');
        }

        let insert_at = spans[0].start;
        for span in spans.iter().rev() {
            self.text.replace_range(span.start..span.end, "");
        }
        self.text.insert_str(insert_at, &replacement);
    }

    /// Remove a section and its subsections; returns whether anything went
    pub fn remove_subtree(&mut self, name: &str) -> bool {
        let spans = self.subtree_spans(name);
        if spans.is_empty() {
            return false;
        }
        for span in spans.iter().rev() {
            self.text.replace_range(span.start..span.end, "");
        }
        true
    }

    /// Insert text right after a section's subtree; returns false if the
    /// section does not exist
    pub fn insert_after_subtree(&mut self, name: &str, text: &str) -> bool {
        let spans = self.subtree_spans(name);
        let Some(last) = spans.last() else {
            return false;
        };
        let insertion = ensure_trailing_newline(text);
        let mut at = last.end;
        // Keep the subtree's trailing blank line attached to the new text's
        // far side rather than splitting sections visually.
        let body = &self.text[last.start..last.end];
        if body.ends_with("\n\n") {
            at -= 1;
        }
        if at > 0 && !self.text[..at].ends_with('\n') {
            self.text.insert(at, '\n');
            at += 1;
        }
        self.text.insert_str(at, &insertion);
        true
    }

    /// Rewrite the text of exactly one section (subsections untouched)
    /// through a function; returns false if the section does not exist
    pub fn map_section_text<F>(&mut self, name: &str, f: F) -> bool
    where
        F: FnOnce(&str) -> String,
    {
        let Some(span) = self.spans().into_iter().find(|s| s.name == name) else {
            return false;
        };
        let new_text = f(&self.text[span.start..span.end]);
        self.text.replace_range(span.start..span.end, &new_text);
        true
    }

    // ------------------------------------------------------------------
    // Top-level scalars (preamble only)
    // ------------------------------------------------------------------

    /// Read a top-level scalar; commented-out assignments do not count
    #[must_use]
    pub fn scalar(&self, key: &str) -> Option<String> {
        let preamble = &self.text[..self.preamble_end()];
        for line in preamble.lines() {
            if let Some(value) = parse_assignment(line, key) {
                return Some(value);
            }
        }
        None
    }

    /// Set a top-level scalar to a quoted string value
    ///
    /// Replaces only the existing assignment line if present; otherwise a
    /// new line is added at the end of the preamble.
    pub fn set_scalar(&mut self, key: &str, value: &str) {
        let assignment = format!("{key} = \"{value}\"\n");
        let preamble_end = self.preamble_end();

        let mut offset = 0;
        for line in self.text[..preamble_end].split_inclusive('\n') {
            if parse_assignment(line, key).is_some() {
                self.text
                    .replace_range(offset..offset + line.len(), &assignment);
                return;
            }
            offset += line.len();
        }

        let mut at = preamble_end;
        if at > 0 && !self.text[..at].ends_with('\n') {
            self.text.insert(at, '\n');
            at += 1;
        }
        self.text.insert_str(at, &assignment);
    }

    /// Remove a top-level scalar assignment; returns whether one existed
    pub fn remove_scalar(&mut self, key: &str) -> bool {
        let preamble_end = self.preamble_end();
        let mut offset = 0;
        for line in self.text[..preamble_end].split_inclusive('\n') {
            if parse_assignment(line, key).is_some() {
                self.text.replace_range(offset..offset + line.len(), "");
                return true;
            }
            offset += line.len();
        }
        false
    }

    /// Write the document behind a best-effort backup, atomically
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn save(&self, path: &Path) -> CoreResult<Option<std::path::PathBuf>> {
        let backup_path = crate::backup::backup_best_effort(path);
        crate::util::write_atomic(path, &self.text)?;
        Ok(backup_path)
    }
}

fn ensure_trailing_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}

/// Parse a `[dotted.section]` header line into its normalized dotted name
fn parse_header(line: &str) -> Option<String> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with('[') {
        return None;
    }
    // Array-of-tables headers are indexed too; we simply never own one.
    let inner_start = if trimmed.starts_with("[[") { 2 } else { 1 };
    let close = if inner_start == 2 { "]]" } else { "]" };
    let rest = &trimmed[inner_start..];
    let end = rest.find(close)?;
    let inner = &rest[..end];

    let components = split_dotted(inner)?;
    if components.is_empty() {
        return None;
    }
    Some(components.join("."))
}

/// Split a dotted key on `.` outside quotes, unquoting each component
fn split_dotted(inner: &str) -> Option<Vec<String>> {
    let mut components = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in inner.chars() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => current.push(c),
            (None, '"' | '\'') => quote = Some(c),
            (None, '.') => {
                components.push(current.trim().to_string());
                current.clear();
            }
            (None, _) => current.push(c),
        }
    }
    if quote.is_some() {
        return None;
    }
    components.push(current.trim().to_string());
    if components.iter().any(String::is_empty) {
        return None;
    }
    Some(components)
}

/// Parse `key = value` on a single line; returns the unquoted value
fn parse_assignment(line: &str, key: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.starts_with('#') {
        return None;
    }
    let rest = trimmed.strip_prefix(key)?;
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=')?;
    let rest = rest.trim_start();

    if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted.find('"')?;
        return Some(quoted[..end].to_string());
    }
    let bare = rest.split('#').next().unwrap_or("").trim();
    if bare.is_empty() {
        None
    } else {
        Some(bare.to_string())
    }
}
