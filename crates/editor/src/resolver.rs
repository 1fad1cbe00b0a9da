//! Picks and builds the widget for a field descriptor.

use std::fmt;
use std::rc::Rc;

use serde_json::Value as JsonValue;
use stepform_registry::OptionLookup;
use stepform_types::{FieldDescriptor, FieldValue, OptionSource, ValueType};
use stepform_util::normalize_switch;

use crate::dom::Node;
use crate::widgets::{
    FieldOptions, ObjectArrayOptions, SetCallback, WidgetHandle, new_array_field, new_data_list_field, new_key_value_field, new_list_field,
    new_number_field, new_object_array_fields_container, new_switch_field, new_text_area_field, resolve_options,
};

/// Widget families the resolver can choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Declared type names a cached list; rendered as an autocomplete input.
    CachedList,
    /// Explicit or cache-referenced options; rendered as a select.
    OptionList,
    Array,
    Switch,
    KeyValue,
    ObjectArray,
    Number,
    Text,
}

impl WidgetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::CachedList => "cached-list",
            WidgetKind::OptionList => "option-list",
            WidgetKind::Array => "array",
            WidgetKind::Switch => "switch",
            WidgetKind::KeyValue => "key-value",
            WidgetKind::ObjectArray => "object-array",
            WidgetKind::Number => "number",
            WidgetKind::Text => "text",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides the widget kind. First match wins:
///
/// 1. the declared type is a cached list key
/// 2. a non-empty option source is attached
/// 3. array, then boolean, then key/value value types
/// 4. otherwise a text widget (numbers and object arrays keep their own
///    text-like widgets so the emitted value matches the value type)
pub fn resolve_kind(descriptor: &FieldDescriptor, lookup: &dyn OptionLookup) -> WidgetKind {
    if lookup.contains_key(&descriptor.declared_type) {
        return WidgetKind::CachedList;
    }
    if descriptor.option_source.as_ref().is_some_and(|source| !source.is_empty()) {
        return WidgetKind::OptionList;
    }
    match descriptor.value_type {
        ValueType::Array => WidgetKind::Array,
        ValueType::Boolean => WidgetKind::Switch,
        ValueType::KeyValue => WidgetKind::KeyValue,
        ValueType::ObjectArray => WidgetKind::ObjectArray,
        ValueType::Number => WidgetKind::Number,
        ValueType::String | ValueType::Enum => WidgetKind::Text,
    }
}

/// Builds the widget [`resolve_kind`] selects, appending it to `container`
/// when one is given.
pub fn build_widget(descriptor: &FieldDescriptor, lookup: &dyn OptionLookup, container: Option<&Node>, callback: SetCallback) -> WidgetHandle {
    let mut options = FieldOptions::new(descriptor.label.clone())
        .with_title(descriptor.help_text.clone())
        .with_initial_value(descriptor.current_value.clone())
        .with_readonly(descriptor.readonly);
    if let Some(container) = container {
        options = options.with_container(container);
    }

    match resolve_kind(descriptor, lookup) {
        WidgetKind::CachedList => {
            let source = OptionSource::CacheKey(descriptor.declared_type.clone());
            new_data_list_field(options, &resolve_options(Some(&source), lookup), conforming(descriptor.value_type, callback))
        }
        WidgetKind::OptionList => new_list_field(
            options,
            &resolve_options(descriptor.option_source.as_ref(), lookup),
            conforming(descriptor.value_type, callback),
        ),
        WidgetKind::Array => new_array_field(options, callback),
        WidgetKind::Switch => new_switch_field(options, callback),
        WidgetKind::KeyValue => new_key_value_field(options, callback),
        WidgetKind::ObjectArray => {
            let slots = descriptor.current_value.clone();
            new_object_array_fields_container(ObjectArrayOptions::from_slots(options, descriptor.label.clone(), &slots), callback)
        }
        WidgetKind::Number => new_number_field(options, callback),
        WidgetKind::Text => new_text_area_field(options, callback),
    }
}

/// Wraps a list widget's callback so the chosen text arrives in the shape of
/// the descriptor's value type. Key/value and object-array fields have no
/// single-choice shape and keep the text.
fn conforming(value_type: ValueType, callback: SetCallback) -> SetCallback {
    Rc::new(move |value: FieldValue| {
        let value = match (value_type, value) {
            (ValueType::Number, FieldValue::Text(text)) => FieldValue::Number(text),
            (ValueType::Boolean, FieldValue::Text(text)) => FieldValue::Boolean(normalize_switch(&JsonValue::String(text))),
            (ValueType::Array, FieldValue::Text(text)) => {
                let trimmed = text.trim();
                FieldValue::List(if trimmed.is_empty() { Vec::new() } else { vec![trimmed.to_string()] })
            }
            (_, value) => value,
        };
        callback(value)
    })
}
