//! Field descriptors: the metadata used to pick and configure a widget.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Placeholder label used when an explicit option omits its name.
pub const MISSING_OPTION_NAME: &str = "No name available";

/// Value category a field edits.
///
/// The category is fixed when the descriptor is built; widgets always emit a
/// [`FieldValue`](crate::FieldValue) matching it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    String,
    Number,
    Boolean,
    Array,
    KeyValue,
    ObjectArray,
    Enum,
}

impl ValueType {
    /// Parses a declared type tag, ignoring case.
    ///
    /// Returns `None` for tags with no built-in widget (for example a cache
    /// list name such as `Macros`); callers decide how to treat those.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "STRING" | "TEXT" => Some(Self::String),
            "NUMBER" | "INT" | "INTEGER" | "DOUBLE" | "FLOAT" => Some(Self::Number),
            "SWITCH" | "BOOLEAN" | "BOOL" => Some(Self::Boolean),
            "ARRAY" => Some(Self::Array),
            "KEY/VALUE" | "KEYVALUE" | "DICTIONARY" => Some(Self::KeyValue),
            "OBJECT_ARRAY" | "OBJECTARRAY" => Some(Self::ObjectArray),
            "ENUM" | "OPTIONS" => Some(Self::Enum),
            _ => None,
        }
    }
}

/// One entry of an explicit option list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl OptionEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
        }
    }

    /// Display name, falling back to a placeholder when the entry is unnamed.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(MISSING_OPTION_NAME)
    }
}

/// Where an enumerated widget gets its options from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    /// Name of a list held by the cache service.
    CacheKey(String),
    /// Options spelled out by the descriptor itself.
    List(Vec<OptionEntry>),
}

/// Raised when an option source has a shape the engine cannot read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OptionSourceError {
    #[error("option source must be a cache key or an array of options, found {found}")]
    InvalidShape { found: String },
    #[error("option entry {index} is malformed: {message}")]
    InvalidEntry { index: usize, message: String },
}

impl OptionSource {
    /// Reads an option source from its JSON form: a string names a cache list,
    /// an array lists the options. Anything else is rejected.
    pub fn from_json(raw: &JsonValue) -> Result<Self, OptionSourceError> {
        match raw {
            JsonValue::String(key) => Ok(Self::CacheKey(key.clone())),
            JsonValue::Array(items) => {
                let mut entries = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let entry = serde_json::from_value::<OptionEntry>(item.clone()).map_err(|error| OptionSourceError::InvalidEntry {
                        index,
                        message: error.to_string(),
                    })?;
                    entries.push(entry);
                }
                Ok(Self::List(entries))
            }
            other => Err(OptionSourceError::InvalidShape {
                found: json_kind(other).to_string(),
            }),
        }
    }

    /// Returns true when the source can never yield an option.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::CacheKey(key) => key.trim().is_empty(),
            Self::List(entries) => entries.is_empty(),
        }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Metadata describing one editable property or parameter.
///
/// A descriptor is a read-only view over caller-owned state; the engine never
/// writes back into it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Property or parameter name inside its owning map.
    pub key: String,
    /// The type tag exactly as declared by the step (for example `Bool` or `Macros`).
    pub declared_type: String,
    /// Value category derived from the declared type.
    pub value_type: ValueType,
    pub label: String,
    pub help_text: String,
    pub current_value: JsonValue,
    pub option_source: Option<OptionSource>,
    pub readonly: bool,
}

impl FieldDescriptor {
    /// Builds a descriptor, deriving the value category from the declared tag.
    ///
    /// Tags without a built-in category become `Enum` when options are
    /// present and `String` otherwise.
    pub fn new(key: impl Into<String>, declared_type: impl Into<String>, current_value: JsonValue) -> Self {
        let key = key.into();
        let declared_type = declared_type.into();
        let value_type = ValueType::from_tag(&declared_type).unwrap_or(ValueType::String);
        Self {
            label: key.clone(),
            key,
            declared_type,
            value_type,
            help_text: String::new(),
            current_value,
            option_source: None,
            readonly: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = help_text.into();
        self
    }

    pub fn with_option_source(mut self, source: Option<OptionSource>) -> Self {
        if ValueType::from_tag(&self.declared_type).is_none() && source.as_ref().is_some_and(|source| !source.is_empty()) {
            self.value_type = ValueType::Enum;
        }
        self.option_source = source;
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_tags_are_case_insensitive() {
        assert_eq!(ValueType::from_tag("bool"), Some(ValueType::Boolean));
        assert_eq!(ValueType::from_tag("Switch"), Some(ValueType::Boolean));
        assert_eq!(ValueType::from_tag("key/value"), Some(ValueType::KeyValue));
        assert_eq!(ValueType::from_tag("Dictionary"), Some(ValueType::KeyValue));
        assert_eq!(ValueType::from_tag("Macros"), None);
    }

    #[test]
    fn option_source_reads_strings_and_arrays() {
        let cached = OptionSource::from_json(&json!("Macros")).expect("cache key");
        assert_eq!(cached, OptionSource::CacheKey("Macros".into()));

        let listed = OptionSource::from_json(&json!([{ "name": "Id", "description": "By id" }, {}])).expect("list");
        let OptionSource::List(entries) = listed else {
            panic!("expected explicit list");
        };
        assert_eq!(entries[0].display_name(), "Id");
        assert_eq!(entries[1].display_name(), MISSING_OPTION_NAME);
    }

    #[test]
    fn option_source_rejects_other_shapes() {
        let error = OptionSource::from_json(&json!({ "name": "x" })).unwrap_err();
        assert_eq!(
            error,
            OptionSourceError::InvalidShape {
                found: "object".into()
            }
        );
        assert!(OptionSource::from_json(&json!(12)).is_err());
    }

    #[test]
    fn unknown_tag_with_options_becomes_enum() {
        let descriptor = FieldDescriptor::new("Locator", "Locator", json!("Xpath"))
            .with_option_source(Some(OptionSource::List(vec![OptionEntry::new("Xpath", "")])));
        assert_eq!(descriptor.value_type, ValueType::Enum);
        assert_eq!(descriptor.label, "Locator");
    }
}
