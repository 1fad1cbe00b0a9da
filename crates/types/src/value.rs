//! Values emitted by widgets through their change callbacks.

use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};

use crate::ValueType;

/// A normalized value handed to a field's change callback.
///
/// Numbers travel as the raw text the user typed and booleans serialize as the
/// literal strings `"true"`/`"false"`; converting either to a native value is
/// the caller's job.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(String),
    Boolean(bool),
    List(Vec<String>),
    Map(IndexMap<String, String>),
    ObjectPatch(ObjectArrayPatch),
}

impl FieldValue {
    /// The value category this value belongs to.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::String,
            Self::Number(_) => ValueType::Number,
            Self::Boolean(_) => ValueType::Boolean,
            Self::List(_) => ValueType::Array,
            Self::Map(_) => ValueType::KeyValue,
            Self::ObjectPatch(_) => ValueType::ObjectArray,
        }
    }

    /// JSON shape stored in the owning step or definition.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Text(text) | Self::Number(text) => JsonValue::String(text.clone()),
            Self::Boolean(flag) => JsonValue::String(flag.to_string()),
            Self::List(items) => JsonValue::Array(items.iter().cloned().map(JsonValue::String).collect()),
            Self::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), JsonValue::String(value.clone())))
                    .collect(),
            ),
            Self::ObjectPatch(patch) => patch.to_json(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Number(text) => Some(text),
            _ => None,
        }
    }
}

/// Partial update emitted by an array-of-objects widget.
///
/// Indices are opaque slot identifiers: the engine never renumbers surviving
/// groups after a removal, so the caller must not assume a dense range.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectArrayPatch {
    /// The group at `index` was deleted.
    Removed { index: usize },
    /// One field inside the group at `index` changed.
    Field {
        index: usize,
        group: String,
        field: String,
        value: Box<FieldValue>,
    },
}

impl ObjectArrayPatch {
    pub fn index(&self) -> usize {
        match self {
            Self::Removed { index } | Self::Field { index, .. } => *index,
        }
    }

    /// Renders the patch as `{ "<index>": null }` or
    /// `{ "<index>": { "<group>": { "<field>": value } } }`.
    pub fn to_json(&self) -> JsonValue {
        let mut outer = Map::new();
        match self {
            Self::Removed { index } => {
                outer.insert(index.to_string(), JsonValue::Null);
            }
            Self::Field {
                index,
                group,
                field,
                value,
            } => {
                let mut fields = Map::new();
                fields.insert(field.clone(), value.to_json());
                let mut groups = Map::new();
                groups.insert(group.clone(), JsonValue::Object(fields));
                outer.insert(index.to_string(), JsonValue::Object(groups));
            }
        }
        JsonValue::Object(outer)
    }

    /// Applies the patch to a slot array, keeping removed slots as `null` so
    /// later indices stay addressable.
    pub fn apply_to(&self, slots: &mut Vec<JsonValue>) {
        let index = self.index();
        if slots.len() <= index {
            slots.resize(index + 1, JsonValue::Object(Map::new()));
        }
        match self {
            Self::Removed { .. } => slots[index] = JsonValue::Null,
            Self::Field { group, field, value, .. } => {
                if !slots[index].is_object() {
                    slots[index] = JsonValue::Object(Map::new());
                }
                if let JsonValue::Object(item) = &mut slots[index] {
                    let group_entry = item.entry(group.clone()).or_insert_with(|| JsonValue::Object(Map::new()));
                    if !group_entry.is_object() {
                        *group_entry = JsonValue::Object(Map::new());
                    }
                    if let JsonValue::Object(fields) = group_entry {
                        fields.insert(field.clone(), value.to_json());
                    }
                }
            }
        }
    }
}
