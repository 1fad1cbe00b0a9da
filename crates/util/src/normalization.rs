//! Coercion of caller-supplied initial values into renderable widget state.
//!
//! Designer documents frequently carry `null`, empty strings, or the literal
//! text `undefined` where no value was ever set. None of those should reach
//! the user as text, so every widget runs its initial value through one of
//! these functions before rendering.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// Marker some producers write in place of a missing value.
pub const UNDEFINED_MARKER: &str = "undefined";

/// Returns true when the value carries something worth rendering.
pub fn has_meaningful_value(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::String(text) => {
            let trimmed = text.trim();
            !trimmed.is_empty() && trimmed != UNDEFINED_MARKER
        }
        JsonValue::Array(items) => !items.is_empty(),
        JsonValue::Object(entries) => !entries.is_empty(),
        JsonValue::Bool(_) | JsonValue::Number(_) => true,
    }
}

/// Text shown by a text widget; missing values become the empty string.
pub fn normalize_text(initial: &JsonValue) -> String {
    match initial {
        JsonValue::Null => String::new(),
        JsonValue::String(text) if text == UNDEFINED_MARKER => String::new(),
        JsonValue::String(text) => text.clone(),
        JsonValue::Number(number) => number.to_string(),
        JsonValue::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

/// Text shown by a number widget; anything that is not a finite number
/// renders empty rather than as `NaN`.
pub fn normalize_number(initial: &JsonValue) -> String {
    match initial {
        JsonValue::Number(number) => number.to_string(),
        JsonValue::String(text) => {
            let trimmed = text.trim();
            match trimmed.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => trimmed.to_string(),
                _ => String::new(),
            }
        }
        _ => String::new(),
    }
}

/// Initial state of a boolean widget. Absent, empty, `undefined`, and `NaN`
/// all mean `false`.
pub fn normalize_switch(initial: &JsonValue) -> bool {
    match initial {
        JsonValue::Bool(flag) => *flag,
        JsonValue::String(text) => text.trim().eq_ignore_ascii_case("true"),
        JsonValue::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
        _ => false,
    }
}

/// Rows of an array-of-strings widget.
pub fn normalize_list(initial: &JsonValue) -> Vec<String> {
    match initial {
        JsonValue::Array(items) => items.iter().map(normalize_text).collect(),
        other if has_meaningful_value(other) => vec![normalize_text(other)],
        _ => Vec::new(),
    }
}

/// Rows of a key/value widget, in document order.
pub fn normalize_map(initial: &JsonValue) -> IndexMap<String, String> {
    match initial {
        JsonValue::Object(entries) => entries
            .iter()
            .map(|(key, value)| (key.clone(), normalize_text(value)))
            .collect(),
        _ => IndexMap::new(),
    }
}
