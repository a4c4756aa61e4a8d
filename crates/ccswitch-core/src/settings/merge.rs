//! Template/existing settings merge
//!
//! Combines the shipped template with a user's live settings without losing
//! user customization. The tree is an untyped ordered JSON document so
//! unknown fields survive; only `env` and `permissions.allow` get special
//! handling.

use serde_json::{Map, Value};

use super::permissions;

/// Merge template settings with existing live settings
///
/// With no existing settings the template is returned verbatim. Otherwise:
/// objects merge recursively with existing scalars winning, lists merge as
/// ordered union with deduplication, `env` keys from existing always win,
/// and `permissions.allow` goes through the permission cleaner with the
/// template as baseline. Idempotent: merging the output again with the same
/// template changes nothing.
#[must_use]
pub fn merge(template: &Value, existing: Option<&Value>) -> Value {
    let Some(existing) = existing else {
        return template.clone();
    };

    let (Some(template_map), Some(existing_map)) = (template.as_object(), existing.as_object())
    else {
        // Non-object settings documents are taken from existing as-is.
        return existing.clone();
    };

    let mut merged = merge_objects(template_map, existing_map);
    merge_allow_list(template_map, existing_map, &mut merged);
    Value::Object(merged)
}

/// Recursive object merge: template keys first (template order), existing
/// keys overlaid (existing wins for scalars), existing-only keys appended.
fn merge_objects(template: &Map<String, Value>, existing: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = Map::new();

    for (key, template_value) in template {
        match existing.get(key) {
            None => {
                merged.insert(key.clone(), template_value.clone());
            }
            Some(existing_value) => {
                merged.insert(key.clone(), merge_values(template_value, existing_value));
            }
        }
    }
    for (key, existing_value) in existing {
        if !merged.contains_key(key) {
            merged.insert(key.clone(), existing_value.clone());
        }
    }

    merged
}

fn merge_values(template: &Value, existing: &Value) -> Value {
    match (template, existing) {
        (Value::Object(t), Value::Object(e)) => Value::Object(merge_objects(t, e)),
        (Value::Array(t), Value::Array(e)) => Value::Array(union_dedup(t, e)),
        // Scalar or shape mismatch: the user's value wins.
        _ => existing.clone(),
    }
}

fn union_dedup(template: &[Value], existing: &[Value]) -> Vec<Value> {
    let mut merged: Vec<Value> = Vec::with_capacity(template.len() + existing.len());
    for item in template.iter().chain(existing) {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

/// Replace `permissions.allow` in the merged output with the cleaner result.
fn merge_allow_list(
    template: &Map<String, Value>,
    existing: &Map<String, Value>,
    merged: &mut Map<String, Value>,
) {
    let template_allow = allow_list(template);
    let existing_allow = allow_list(existing);
    if template_allow.is_empty() && existing_allow.is_empty() {
        return;
    }

    let cleaned = permissions::clean(&template_allow, &existing_allow);
    let permissions_obj = merged
        .entry("permissions".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if let Some(obj) = permissions_obj.as_object_mut() {
        obj.insert(
            "allow".to_string(),
            Value::Array(cleaned.into_iter().map(Value::String).collect()),
        );
    }
}

fn allow_list(settings: &Map<String, Value>) -> Vec<String> {
    settings
        .get("permissions")
        .and_then(|p| p.get("allow"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}
