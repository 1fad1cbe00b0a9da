//! Boolean field rendered as a two-option select.

use stepform_types::FieldValue;
use stepform_util::normalize_switch;

use super::{FieldOptions, SetCallback, TOOLTIP, WidgetHandle, mount};
use crate::container::build_field;
use crate::dom::{EventKind, Node, Role};
use crate::ids::new_id;

/// Rendered as a select holding exactly "True" and "False". The select can
/// still be cleared to no selection, which emits nothing.
pub fn new_switch_field(options: FieldOptions, callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.label, &options.title);
    let initial = normalize_switch(&options.initial_value).to_string();

    let select = Node::new(Role::Select)
        .with_id(id.as_str())
        .with_attribute(TOOLTIP, initial.clone());
    for (value, text) in [("true", "True"), ("false", "False")] {
        let option = Node::new(Role::Option).with_attribute("value", value).with_text(text);
        if value == initial {
            option.set_attribute("selected", "true");
        }
        select.append_child(&option);
    }
    select.set_value(initial);

    select.add_listener(EventKind::Input, move |event| {
        let value = event.target().value();
        event.target().set_attribute(TOOLTIP, value.clone());
        match value.as_str() {
            "true" => callback(FieldValue::Boolean(true)),
            "false" => callback(FieldValue::Boolean(false)),
            _ => {}
        }
    });
    skeleton.controller_area.append_child(&select);
    mount(&options, skeleton)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value as JsonValue, json};

    use super::*;
    use crate::widgets::test_support::recorder;

    #[test]
    fn missing_or_garbage_initial_values_render_false() {
        for initial in [JsonValue::Null, json!("undefined"), json!("NaN"), json!(false), json!("")] {
            let (callback, _) = recorder();
            let handle = new_switch_field(FieldOptions::new("Enabled").with_initial_value(initial), callback);
            assert_eq!(handle.control(Role::Select).map(|node| node.value()).as_deref(), Some("false"));
        }
    }

    #[test]
    fn offers_exactly_true_and_false() {
        let (callback, _) = recorder();
        let handle = new_switch_field(FieldOptions::new("Enabled").with_initial_value(json!(true)), callback);
        let select = handle.control(Role::Select).expect("select");
        let labels: Vec<_> = select.find_all_by_role(Role::Option).iter().map(Node::text).collect();
        assert_eq!(labels, vec!["True", "False"]);
        assert_eq!(select.value(), "true");
    }

    #[test]
    fn only_a_real_choice_emits() {
        let (callback, seen) = recorder();
        let handle = new_switch_field(FieldOptions::new("Enabled"), callback);
        let select = handle.control(Role::Select).expect("select");
        select.user_input("");
        select.user_input("true");
        select.user_input("false");
        assert_eq!(*seen.borrow(), vec![FieldValue::Boolean(true), FieldValue::Boolean(false)]);
    }
}
