//! Stable slug derivation from display names
//!
//! Slugs are the stable ids of profiles: lowercase, hyphen-separated, and
//! deterministic so repeated writes with the same name are idempotent.
//! Uniqueness is the caller's job; `unique` appends `-2`, `-3`, ... on
//! collision.

/// Derive a slug from a human-entered display name
///
/// Lowercases, trims, collapses runs of non-alphanumeric characters into a
/// single hyphen, and strips leading/trailing hyphens. An empty result falls
/// back to the literal `profile`.
#[must_use]
pub fn generate(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        "profile".to_string()
    } else {
        slug
    }
}

/// Derive a slug that does not collide with any id in `taken`
#[must_use]
pub fn unique<F>(name: &str, taken: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base = generate(name);
    if !taken(&base) {
        return base;
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{base}-{counter}");
        if !taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(generate("My Work Account"), "my-work-account");
        assert_eq!(generate("  Team / EU  "), "team-eu");
        assert_eq!(generate("a__b--c"), "a-b-c");
    }

    #[test]
    fn empty_falls_back_to_profile() {
        assert_eq!(generate(""), "profile");
        assert_eq!(generate("!!!"), "profile");
    }

    #[test]
    fn generation_is_stable() {
        let first = generate("Work (API)");
        assert_eq!(first, generate("Work (API)"));
        assert_eq!(first, "work-api");
    }

    #[test]
    fn unique_appends_numeric_suffix() {
        let existing = ["work", "work-2"];
        let id = unique("Work", |candidate| existing.contains(&candidate));
        assert_eq!(id, "work-3");
    }
}
