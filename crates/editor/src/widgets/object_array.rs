//! Growable array of objects.
//!
//! Each object is a collapsible group made of named sections, and each
//! section holds ordinary widgets. Objects live in slots: a slot index is
//! handed out once and never reused, so removing an object leaves a gap
//! rather than shifting its neighbours.

use std::cell::Cell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use stepform_types::{FieldValue, ObjectArrayPatch, ValueType};
use tracing::{debug, warn};

use super::rows::ACTION;
use super::{FieldOptions, SetCallback, WidgetHandle, build_typed_widget, mount};
use crate::container::{build_collapsible_group, build_field};
use crate::dom::{EventKind, Node, Role};
use crate::ids::new_id;

/// Attribute carrying the slot index of an object group.
pub const SLOT: &str = "data-slot";

/// Describes one field inside an object section.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectFieldSchema {
    pub label: String,
    pub title: String,
    /// Declared type tag, resolved with [`ValueType::from_tag`].
    pub field_type: String,
    pub value: JsonValue,
}

impl ObjectFieldSchema {
    pub fn new(label: impl Into<String>, field_type: impl Into<String>, value: JsonValue) -> Self {
        Self {
            label: label.into(),
            title: String::new(),
            field_type: field_type.into(),
            value,
        }
    }

    /// Guesses a schema from a stored value.
    pub fn infer(label: &str, value: &JsonValue) -> Self {
        let field_type = match value {
            JsonValue::Bool(_) => "BOOLEAN",
            JsonValue::Number(_) => "NUMBER",
            JsonValue::Array(_) => "ARRAY",
            JsonValue::Object(_) => "KEYVALUE",
            JsonValue::Null | JsonValue::String(_) => "STRING",
        };
        Self::new(label, field_type, value.clone())
    }
}

/// Section name to field name to field schema.
pub type ObjectItemSchema = IndexMap<String, IndexMap<String, ObjectFieldSchema>>;

/// Reads a stored object (`{section: {field: value}}`) into a schema.
/// `null` is a vacated slot; other non-objects are treated the same way.
pub fn infer_item_schema(item: &JsonValue) -> Option<ObjectItemSchema> {
    let sections = item.as_object()?;
    Some(
        sections
            .iter()
            .map(|(section, fields)| {
                let fields: IndexMap<String, ObjectFieldSchema> = fields
                    .as_object()
                    .map(|fields| {
                        fields
                            .iter()
                            .map(|(name, value)| (name.clone(), ObjectFieldSchema::infer(name, value)))
                            .collect()
                    })
                    .unwrap_or_default();
                (section.clone(), fields)
            })
            .collect(),
    )
}

#[derive(Debug, Clone, Default)]
pub struct ObjectArrayOptions {
    pub field: FieldOptions,
    /// Prefix of each object's summary label.
    pub item_label: String,
    /// One entry per slot; `None` marks a vacated slot that is not rendered.
    pub items: Vec<Option<ObjectItemSchema>>,
    /// Shape used for additions when no item is present.
    pub template: Option<ObjectItemSchema>,
}

impl ObjectArrayOptions {
    /// Builds options from a stored slot array, inferring each item's schema.
    pub fn from_slots(field: FieldOptions, item_label: impl Into<String>, slots: &JsonValue) -> Self {
        let items = slots
            .as_array()
            .map(|slots| slots.iter().map(infer_item_schema).collect())
            .unwrap_or_default();
        Self {
            field,
            item_label: item_label.into(),
            items,
            template: None,
        }
    }

    pub fn with_template(mut self, template: ObjectItemSchema) -> Self {
        self.template = Some(template);
        self
    }

    /// The shape new objects are seeded from: the first present item, else the template.
    fn shape(&self) -> Option<ObjectItemSchema> {
        self.items.iter().flatten().next().cloned().or_else(|| self.template.clone())
    }
}

/// Renders every present slot as a collapsible object group plus an add
/// control. Field edits emit [`ObjectArrayPatch::Field`]; removing an object
/// emits [`ObjectArrayPatch::Removed`] for its slot.
pub fn new_object_array_fields_container(options: ObjectArrayOptions, callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.field.label, &options.field.title);
    let controller = skeleton.controller_area.clone();
    let item_label = if options.item_label.is_empty() { "Item".to_string() } else { options.item_label.clone() };

    let add = Node::new(Role::Button)
        .with_attribute(ACTION, "add")
        .with_text(format!("+ {item_label}"));
    controller.append_child(&add);

    for (index, item) in options.items.iter().enumerate() {
        if let Some(schema) = item {
            let group = build_item(index, schema, &item_label, false, options.field.is_readonly, &callback);
            controller.append_child(&group);
        }
    }

    let next_slot = Rc::new(Cell::new(options.items.len()));
    let shape = options.shape();
    let weak_controller = controller.downgrade();
    add.add_listener(EventKind::Activate, move |_| {
        let Some(controller) = weak_controller.upgrade() else {
            debug!("object array controller is gone; ignoring add");
            return;
        };
        let Some(shape) = shape.as_ref() else {
            debug!("object array has no item shape; ignoring add");
            return;
        };
        let index = next_slot.get();
        next_slot.set(index + 1);
        controller.append_child(&build_item(index, shape, &item_label, true, false, &callback));
    });

    mount(&options.field, skeleton)
}

fn build_item(
    index: usize,
    schema: &ObjectItemSchema,
    item_label: &str,
    fresh: bool,
    readonly: bool,
    callback: &SetCallback,
) -> Node {
    let item = build_collapsible_group(&new_id(), &format!("{item_label} {}", index + 1), "", "object-item");
    item.root.set_attribute(SLOT, index.to_string());

    let remove = Node::new(Role::Button).with_attribute(ACTION, "remove").with_text("−");
    let weak_item = item.root.downgrade();
    let on_remove = callback.clone();
    remove.add_listener(EventKind::Activate, move |event| {
        event.stop_propagation();
        let Some(item) = weak_item.upgrade() else {
            debug!(index, "object group is gone; ignoring remove");
            return;
        };
        item.remove();
        on_remove(FieldValue::ObjectPatch(ObjectArrayPatch::Removed { index }));
    });
    item.controller_area.append_child(&remove);
    if readonly {
        remove.set_readonly(true);
    }

    for (section_name, fields) in schema {
        let section = build_collapsible_group(&new_id(), section_name, "", "object-section");
        item.controller_area.append_child(&section.root);
        for (field_name, field) in fields {
            let value_type = match ValueType::from_tag(&field.field_type) {
                Some(value_type @ (ValueType::String | ValueType::Number | ValueType::Boolean | ValueType::Array | ValueType::KeyValue)) => value_type,
                _ => {
                    warn!(field = %field_name, field_type = %field.field_type, "unsupported field type in object array; skipping");
                    continue;
                }
            };
            let field_options = FieldOptions::new(field.label.clone())
                .with_title(field.title.clone())
                .with_initial_value(if fresh { JsonValue::Null } else { field.value.clone() })
                .with_readonly(readonly)
                .with_container(&section.controller_area);

            let sink = callback.clone();
            let group = section_name.clone();
            let name = field_name.clone();
            let on_edit: SetCallback = Rc::new(move |value: FieldValue| {
                sink(FieldValue::ObjectPatch(ObjectArrayPatch::Field {
                    index,
                    group: group.clone(),
                    field: name.clone(),
                    value: Box::new(value),
                }));
            });
            if build_typed_widget(value_type, field_options, on_edit).is_none() {
                debug!(field = %field_name, "no widget for object array field");
            }
        }
    }
    item.root
}
