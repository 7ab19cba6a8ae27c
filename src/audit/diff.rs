//! Diff generation for audit logging
//!
//! Summarises which fields changed between two versions of a record.

use crate::models::{FieldValue, Record};

const MAX_TEXT_LEN: usize = 50;

/// Generate a human-readable diff between two versions of a record
///
/// Returns `None` when no field changed.
pub fn generate_diff(before: &Record, after: &Record) -> Option<String> {
    let mut changes = Vec::new();

    for (key, before_val) in before.fields() {
        match after.get(key) {
            Some(after_val) if after_val != before_val => changes.push(format!(
                "{}: {} -> {}",
                key,
                format_value(before_val),
                format_value(after_val)
            )),
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", key, format_value(before_val))),
        }
    }

    for (key, after_val) in after.fields() {
        if before.get(key).is_none() {
            changes.push(format!("{}: (added) -> {}", key, format_value(after_val)));
        }
    }

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Format a field value for the summary, quoting and truncating text
fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) if s.chars().count() > MAX_TEXT_LEN => {
            let head: String = s.chars().take(MAX_TEXT_LEN - 3).collect();
            format!("\"{}...\"", head)
        }
        FieldValue::Text(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}
