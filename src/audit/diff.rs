//! Field-level change extraction
//!
//! Compares two JSON snapshots of a document and reports the top-level fields
//! whose values differ. Bookkeeping fields (`_id`, `__v`, timestamps) and
//! secrets (`password`) never appear in a change set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields excluded from diffs, snapshots restores and rollbacks
pub const INTERNAL_FIELDS: &[&str] = &["_id", "__v", "createdAt", "updatedAt", "password"];

/// Whether a field is internal bookkeeping
pub fn is_internal_field(field: &str) -> bool {
    INTERNAL_FIELDS.contains(&field)
}

/// One changed field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: String,
    pub old_value: Value,
    pub new_value: Value,
}

impl FieldChange {
    pub fn new(field: impl Into<String>, old_value: Value, new_value: Value) -> Self {
        Self {
            field: field.into(),
            old_value,
            new_value,
        }
    }
}

/// Extract the changed top-level fields between two snapshots
///
/// Non-object inputs are treated as empty documents, so diffing `Null` against a
/// document lists every non-internal field as added. A field missing on one side
/// reports `null` for that side. Fields are returned in lexical order.
///
/// Values compare as `serde_json::Value`, so `1` and `1.0` count as a change.
/// Models store amounts as integer cents, which never mixes the two.
pub fn extract_changes(old_data: &Value, new_data: &Value) -> Vec<FieldChange> {
    let empty = Map::new();
    let old_obj = old_data.as_object().unwrap_or(&empty);
    let new_obj = new_data.as_object().unwrap_or(&empty);

    let fields: BTreeSet<&String> = old_obj.keys().chain(new_obj.keys()).collect();

    fields
        .into_iter()
        .filter(|field| !is_internal_field(field))
        .filter_map(|field| {
            let before = old_obj.get(field.as_str());
            let after = new_obj.get(field.as_str());
            if before == after {
                return None;
            }
            Some(FieldChange::new(
                field.clone(),
                before.cloned().unwrap_or(Value::Null),
                after.cloned().unwrap_or(Value::Null),
            ))
        })
        .collect()
}

/// Human-readable one-line summary of a change set
pub fn summarize_changes(changes: &[FieldChange]) -> Option<String> {
    if changes.is_empty() {
        return None;
    }

    Some(
        changes
            .iter()
            .map(|c| {
                format!(
                    "{}: {} -> {}",
                    c.field,
                    format_value(&c.old_value),
                    format_value(&c.new_value)
                )
            })
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Format a JSON value for human-readable display
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => {
            if s.chars().count() > 50 {
                format!("\"{}...\"", s.chars().take(47).collect::<String>())
            } else {
                format!("\"{}\"", s)
            }
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
