//! Growable map of string keys to string values.

use std::rc::Rc;

use indexmap::IndexMap;
use stepform_types::FieldValue;
use stepform_util::normalize_map;

use super::rows::{RowBehavior, rows_of};
use super::{FieldOptions, SetCallback, TOOLTIP, WidgetHandle, mount};
use crate::container::build_field;
use crate::dom::{Node, Role};
use crate::ids::new_id;

/// Identifies the key and value inputs of a row.
pub const PART: &str = "data-part";

/// Each row holds a key input and a value input. Every scan rebuilds the map
/// in row order: rows with a blank key are skipped, and a repeated key takes
/// the value of its last row.
pub fn new_key_value_field(options: FieldOptions, callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.label, &options.title);
    let mut seeds = normalize_map(&options.initial_value)
        .into_iter()
        .map(|(key, value)| vec![key, value]);
    let first = seeds.next().unwrap_or_default();
    let rest: Vec<Vec<String>> = seeds.collect();

    let behavior = RowBehavior {
        factory: Rc::new(|seed: &[String]| {
            ["key", "value"]
                .into_iter()
                .enumerate()
                .map(|(position, part)| {
                    let text = seed.get(position).cloned().unwrap_or_default();
                    let input = Node::new(Role::Input)
                        .with_attribute(PART, part)
                        .with_attribute("placeholder", part)
                        .with_attribute(TOOLTIP, text.clone());
                    input.set_value(text);
                    input
                })
                .collect::<Vec<Node>>()
        }),
        rescan: Rc::new(move |controller: &Node| callback(FieldValue::Map(scan(controller)))),
    };
    behavior.populate(&skeleton.controller_area, &first, &rest);
    mount(&options, skeleton)
}

fn scan(controller: &Node) -> IndexMap<String, String> {
    let mut entries = IndexMap::new();
    for row in rows_of(controller) {
        let (Some(key), Some(value)) = (part(&row, "key"), part(&row, "value")) else {
            continue;
        };
        let key_text = key.value();
        let value_text = value.value();
        key.set_attribute(TOOLTIP, key_text.clone());
        value.set_attribute(TOOLTIP, value_text.clone());

        let trimmed = key_text.trim();
        if trimmed.is_empty() {
            continue;
        }
        entries.insert(trimmed.to_string(), value_text);
    }
    entries
}

fn part(row: &Node, name: &str) -> Option<Node> {
    row.find_first(&|node: &Node| node.role() == Role::Input && node.attribute(PART).as_deref() == Some(name))
}
