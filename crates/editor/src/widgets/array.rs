//! Growable list of strings.

use std::rc::Rc;

use stepform_types::FieldValue;
use stepform_util::normalize_list;

use super::rows::{RowBehavior, rows_of};
use super::{FieldOptions, SetCallback, TOOLTIP, WidgetHandle, mount};
use crate::container::build_field;
use crate::dom::{Node, Role};
use crate::ids::new_id;

/// One input per row. Any edit or removal emits the whole list of non-empty
/// trimmed values in row order.
pub fn new_array_field(options: FieldOptions, callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.label, &options.title);
    let mut values = normalize_list(&options.initial_value).into_iter();
    let first = vec![values.next().unwrap_or_default()];
    let rest: Vec<Vec<String>> = values.map(|value| vec![value]).collect();

    let behavior = RowBehavior {
        factory: Rc::new(|seed: &[String]| {
            let value = seed.first().cloned().unwrap_or_default();
            let input = Node::new(Role::Input)
                .with_attribute("type", "text")
                .with_attribute(TOOLTIP, value.clone());
            input.set_value(value);
            vec![input]
        }),
        rescan: Rc::new(move |controller: &Node| callback(FieldValue::List(scan(controller)))),
    };
    behavior.populate(&skeleton.controller_area, &first, &rest);
    mount(&options, skeleton)
}

fn scan(controller: &Node) -> Vec<String> {
    let mut items = Vec::new();
    for row in rows_of(controller) {
        for input in row.find_all_by_role(Role::Input) {
            let value = input.value();
            input.set_attribute(TOOLTIP, value.clone());
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                items.push(trimmed.to_string());
            }
        }
    }
    items
}
