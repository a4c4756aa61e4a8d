//! Permission list cleaning
//!
//! Deduplicates and prunes the `permissions.allow` grant list when merging
//! template settings into a user's live settings. Pure function, no I/O.

/// Legacy malformed glob grants written by old template versions; always
/// dropped from the existing list.
const DENYLIST: &[&str] = &["*", "**", "(*)"];

/// Merge template and existing grant lists
///
/// The template list is the authoritative baseline and comes first in its
/// original order. Existing entries survive, in order, unless they are on
/// the denylist, already present, or a narrower form of a template grant
/// (a strict prefix of the entry matches a template entry and is immediately
/// followed by `(`, e.g. `Bash(mkdir:*)` once `Bash` is granted). Exact
/// equality with a template entry is plain deduplication, not redundancy.
#[must_use]
pub fn clean(template: &[String], existing: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(template.len() + existing.len());
    for entry in template {
        if !result.contains(entry) {
            result.push(entry.clone());
        }
    }

    for entry in existing {
        if DENYLIST.contains(&entry.as_str()) {
            continue;
        }
        if result.contains(entry) {
            continue;
        }
        if implied_by_template(entry, template) {
            continue;
        }
        result.push(entry.clone());
    }

    result
}

fn implied_by_template(entry: &str, template: &[String]) -> bool {
    template.iter().any(|t| {
        t != entry
            && entry.len() > t.len()
            && entry.starts_with(t.as_str())
            && entry[t.len()..].starts_with('(')
    })
}
