//! Widget builders.
//!
//! Every builder follows the same contract: it takes [`FieldOptions`] plus a
//! change callback, builds a field skeleton, fills its controller area, wires
//! an edit listener that calls back with a normalized [`FieldValue`] on every
//! change, and returns a [`WidgetHandle`]. Nothing is debounced.

pub mod array;
pub mod key_value;
pub mod list;
pub mod object_array;
pub(crate) mod rows;
pub mod switch;
pub mod text;

use std::rc::Rc;

use serde_json::Value as JsonValue;
use stepform_types::{FieldValue, ValueType};

use crate::container::ContainerSkeleton;
use crate::dom::{Node, Role};
use crate::ids::WidgetId;

pub use array::new_array_field;
pub use key_value::new_key_value_field;
pub use list::{ResolvedOption, new_data_list_field, new_list_field, resolve_options};
pub use object_array::{ObjectArrayOptions, ObjectFieldSchema, ObjectItemSchema, new_object_array_fields_container};
pub use switch::new_switch_field;
pub use text::{new_number_field, new_text_area_field, new_text_field};

/// Change sink handed to a widget. Called synchronously from the edit listener.
pub type SetCallback = Rc<dyn Fn(FieldValue)>;

/// Attribute mirroring the current value as hover help.
pub const TOOLTIP: &str = "title";

/// Shared inputs of every widget builder.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub label: String,
    /// Help text revealed by the hint toggle.
    pub title: String,
    pub initial_value: JsonValue,
    pub is_readonly: bool,
    /// When set, the built field is appended here and this node is returned as the mount.
    pub container: Option<Node>,
}

impl FieldOptions {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_initial_value(mut self, value: JsonValue) -> Self {
        self.initial_value = value;
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.is_readonly = readonly;
        self
    }

    pub fn with_container(mut self, container: &Node) -> Self {
        self.container = Some(container.clone());
        self
    }
}

/// A built widget: its id, its skeleton, and the node handed back to the caller.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    pub id: WidgetId,
    pub skeleton: ContainerSkeleton,
    /// The supplied container when there was one, otherwise the skeleton root.
    pub mount: Node,
}

impl WidgetHandle {
    /// The first descendant of the controller area with `role`.
    pub fn control(&self, role: Role) -> Option<Node> {
        self.skeleton.controller_area.find_by_role(role)
    }
}

/// Applies the readonly flag and places the skeleton.
pub(crate) fn mount(options: &FieldOptions, skeleton: ContainerSkeleton) -> WidgetHandle {
    if options.is_readonly {
        skeleton.root.set_readonly_tree(true);
    }
    let mount = match &options.container {
        Some(container) => {
            container.append_child(&skeleton.root);
            container.clone()
        }
        None => skeleton.root.clone(),
    };
    WidgetHandle {
        id: skeleton.id.clone(),
        skeleton,
        mount,
    }
}

/// Builds the plain widget for a value category, or `None` when the category
/// has no standalone widget (enumerations need a source and object arrays
/// need a schema).
pub fn build_typed_widget(value_type: ValueType, options: FieldOptions, callback: SetCallback) -> Option<WidgetHandle> {
    let handle = match value_type {
        ValueType::String => new_text_area_field(options, callback),
        ValueType::Number => new_number_field(options, callback),
        ValueType::Boolean => new_switch_field(options, callback),
        ValueType::Array => new_array_field(options, callback),
        ValueType::KeyValue => new_key_value_field(options, callback),
        ValueType::Enum | ValueType::ObjectArray => return None,
    };
    Some(handle)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::rc::Rc;

    use stepform_types::FieldValue;

    use super::SetCallback;

    /// A callback that records every value it receives.
    pub(crate) fn recorder() -> (SetCallback, Rc<RefCell<Vec<FieldValue>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        (Rc::new(move |value: FieldValue| sink.borrow_mut().push(value)), seen)
    }
}
