//! Single-line, auto-growing multi-line, and number inputs.

use stepform_types::FieldValue;
use stepform_util::{normalize_number, normalize_text};

use super::{FieldOptions, SetCallback, TOOLTIP, WidgetHandle, mount};
use crate::container::build_field;
use crate::dom::{EventKind, Node, Role};
use crate::ids::new_id;

/// Visual lines a multi-line field grows to before it scrolls instead.
pub const MAX_VISIBLE_LINES: usize = 8;

/// Attribute set on a multi-line field once its content outgrows the cap.
pub const SCROLLABLE: &str = "data-scrollable";

pub fn new_text_field(options: FieldOptions, callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.label, &options.title);
    let initial = normalize_text(&options.initial_value);
    let input = Node::new(Role::Input)
        .with_id(id.as_str())
        .with_attribute("type", "text")
        .with_attribute(TOOLTIP, initial.clone());
    input.set_value(initial);

    input.add_listener(EventKind::Input, move |event| {
        let value = event.target().value();
        event.target().set_attribute(TOOLTIP, value.clone());
        callback(FieldValue::Text(value));
    });
    skeleton.controller_area.append_child(&input);
    mount(&options, skeleton)
}

/// Multi-line text that resizes to its content on every edit.
pub fn new_text_area_field(options: FieldOptions, callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.label, &options.title);
    let initial = normalize_text(&options.initial_value);
    let area = Node::new(Role::TextArea)
        .with_id(id.as_str())
        .with_attribute(TOOLTIP, initial.clone());
    fit_to_content(&area, &initial);
    area.set_value(initial);

    area.add_listener(EventKind::Input, move |event| {
        let target = event.target();
        let value = target.value();
        target.set_attribute(TOOLTIP, value.clone());
        fit_to_content(target, &value);
        callback(FieldValue::Text(value));
    });
    skeleton.controller_area.append_child(&area);
    mount(&options, skeleton)
}

/// Numeric input. The raw text is emitted; parsing is left to the caller.
pub fn new_number_field(options: FieldOptions, callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.label, &options.title);
    let initial = normalize_number(&options.initial_value);
    let input = Node::new(Role::Input)
        .with_id(id.as_str())
        .with_attribute("type", "number")
        .with_attribute(TOOLTIP, initial.clone());
    input.set_value(initial);

    input.add_listener(EventKind::Input, move |event| {
        let value = event.target().value();
        event.target().set_attribute(TOOLTIP, value.clone());
        callback(FieldValue::Number(value));
    });
    skeleton.controller_area.append_child(&input);
    mount(&options, skeleton)
}

fn fit_to_content(area: &Node, content: &str) {
    let lines = content.lines().count().max(1) + usize::from(content.ends_with('\n'));
    area.set_attribute("rows", lines.min(MAX_VISIBLE_LINES).to_string());
    if lines > MAX_VISIBLE_LINES {
        area.set_attribute(SCROLLABLE, "true");
    } else {
        area.remove_attribute(SCROLLABLE);
    }
}
