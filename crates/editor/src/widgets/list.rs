//! Enumerated fields: a plain select and an autocomplete input backed by a datalist.

use std::collections::BTreeMap;

use stepform_registry::OptionLookup;
use stepform_types::{FieldValue, OptionSource};
use stepform_util::normalize_text;

use super::{FieldOptions, SetCallback, TOOLTIP, WidgetHandle, mount};
use crate::container::build_field;
use crate::dom::{EventKind, Node, Role};
use crate::ids::new_id;

/// One selectable option with its hover help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOption {
    pub key: String,
    pub summary: String,
}

/// Resolves an option source into options sorted by key (ordinal, so
/// case-sensitive). An absent cache key yields no options. Duplicate keys
/// keep the last entry.
pub fn resolve_options(source: Option<&OptionSource>, lookup: &dyn OptionLookup) -> Vec<ResolvedOption> {
    let mut sorted = BTreeMap::new();
    match source {
        Some(OptionSource::CacheKey(key)) => {
            for (name, entry) in lookup.resolve(key).iter() {
                sorted.insert(name.clone(), entry.summary_text());
            }
        }
        Some(OptionSource::List(entries)) => {
            for entry in entries {
                sorted.insert(entry.display_name().to_string(), entry.description.clone().unwrap_or_default());
            }
        }
        None => {}
    }
    sorted
        .into_iter()
        .map(|(key, summary)| ResolvedOption { key, summary })
        .collect()
}

fn option_node(option: &ResolvedOption) -> Node {
    Node::new(Role::Option)
        .with_attribute("value", option.key.clone())
        .with_attribute(TOOLTIP, option.summary.clone())
        .with_text(option.key.clone())
}

/// Single-select list.
pub fn new_list_field(options: FieldOptions, choices: &[ResolvedOption], callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.label, &options.title);
    let initial = normalize_text(&options.initial_value);

    let select = Node::new(Role::Select)
        .with_id(id.as_str())
        .with_attribute(TOOLTIP, initial.clone());
    for choice in choices {
        let node = option_node(choice);
        if choice.key == initial {
            node.set_attribute("selected", "true");
        }
        select.append_child(&node);
    }
    select.set_value(initial);

    select.add_listener(EventKind::Input, move |event| {
        let value = event.target().value();
        event.target().set_attribute(TOOLTIP, value.clone());
        callback(FieldValue::Text(value));
    });
    skeleton.controller_area.append_child(&select);
    mount(&options, skeleton)
}

/// Free-text input that suggests the given options but accepts anything,
/// so aliases and macro expressions can be typed directly.
pub fn new_data_list_field(options: FieldOptions, choices: &[ResolvedOption], callback: SetCallback) -> WidgetHandle {
    let id = new_id();
    let skeleton = build_field(&id, &options.label, &options.title);
    let initial = normalize_text(&options.initial_value);
    let list_id = format!("{id}-options");

    let input = Node::new(Role::Input)
        .with_id(id.as_str())
        .with_attribute("list", list_id.clone())
        .with_attribute(TOOLTIP, initial.clone());
    input.set_value(initial);
    let datalist = Node::new(Role::DataList).with_id(list_id);
    for choice in choices {
        datalist.append_child(&option_node(choice));
    }

    input.add_listener(EventKind::Input, move |event| {
        let value = event.target().value();
        event.target().set_attribute(TOOLTIP, value.clone());
        callback(FieldValue::Text(value));
    });
    skeleton.controller_area.append_child(&input);
    skeleton.controller_area.append_child(&datalist);
    mount(&options, skeleton)
}
