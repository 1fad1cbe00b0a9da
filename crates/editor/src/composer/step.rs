//! Per-step panel: title, name, properties, and parameters.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use stepform_registry::OptionLookup;
use stepform_types::{Definition, FieldValue, Step, StepField};
use tracing::debug;

use super::{Editor, EditorContext, append_title, store_value};
use crate::container::build_collapsible_group;
use crate::dom::{Node, Role};
use crate::error::EditorError;
use crate::ids::new_id;
use crate::resolver::build_widget;
use crate::widgets::{FieldOptions, SetCallback, new_text_field};

/// Always hidden from the properties panel.
const RULES_PROPERTY: &str = "Rules";
/// Hidden from the properties panel when the step declares parameters.
const ARGUMENT_PROPERTY: &str = "Argument";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldScope {
    Properties,
    Parameters,
}

/// Builds the editor for `step`, which must be part of `definition`.
///
/// Fails without producing a panel when any field carries an unusable option
/// source, or when the step cannot be found in the definition.
pub fn step_editor_provider(
    step: &Step,
    context: Rc<dyn EditorContext>,
    definition: &Rc<RefCell<Definition>>,
    lookup: &dyn OptionLookup,
) -> Result<Editor, EditorError> {
    if definition.borrow().find_step(&step.id).is_none() {
        return Err(EditorError::StepNotFound(step.id.clone()));
    }

    let panel = Node::new(Role::Panel);
    let plugin = lookup.plugin(&step.step_type);
    let subtitle = step
        .category
        .clone()
        .or_else(|| plugin.and_then(|plugin| plugin.category.clone()));
    let help = step
        .description
        .clone()
        .or_else(|| plugin.map(|plugin| plugin.summary.join(" ")))
        .unwrap_or_default();
    append_title(&panel, step.display_name(), subtitle.as_deref(), &help);

    new_text_field(
        FieldOptions::new("Name")
            .with_title("Name shown for this step in the flow.")
            .with_initial_value(JsonValue::String(step.name.clone()))
            .with_container(&panel),
        name_callback(Rc::downgrade(definition), step.id.clone(), context.clone()),
    );

    let properties: Vec<(&String, &StepField)> = step
        .properties
        .iter()
        .filter(|(key, _)| key.as_str() != RULES_PROPERTY)
        .filter(|(key, _)| step.parameters.is_empty() || key.as_str() != ARGUMENT_PROPERTY)
        .collect();
    let sections = [
        ("Properties", "Values that configure what this step does.", FieldScope::Properties, properties),
        (
            "Parameters",
            "Runtime parameters passed to the plugin.",
            FieldScope::Parameters,
            step.parameters.iter().collect(),
        ),
    ];

    for (label, help, scope, mut fields) in sections {
        fields.sort_by(|(left, _), (right, _)| left.cmp(right));
        let section = build_collapsible_group(&new_id(), label, help, &label.to_ascii_lowercase());
        for (key, step_field) in fields {
            let descriptor = step_field.descriptor(key).map_err(|source| EditorError::InvalidOptionSource {
                key: key.clone(),
                source,
            })?;
            let callback = field_callback(Rc::downgrade(definition), step.id.clone(), scope, key.clone(), context.clone());
            build_widget(&descriptor, lookup, Some(&section.controller_area), callback);
        }
        panel.append_child(&section.root);
    }

    Ok(Editor::new(panel))
}

fn name_callback(definition: Weak<RefCell<Definition>>, step_id: String, context: Rc<dyn EditorContext>) -> SetCallback {
    Rc::new(move |value: FieldValue| {
        let Some(definition) = definition.upgrade() else {
            debug!(step = %step_id, "definition dropped; ignoring rename");
            return;
        };
        let renamed = {
            let mut definition = definition.borrow_mut();
            match definition.find_step_mut(&step_id) {
                Some(step) => {
                    step.name = value.as_text().unwrap_or_default().to_string();
                    true
                }
                None => false,
            }
        };
        if renamed {
            context.notify_name_changed();
        } else {
            debug!(step = %step_id, "step no longer in definition; dropping rename");
        }
    })
}

fn field_callback(
    definition: Weak<RefCell<Definition>>,
    step_id: String,
    scope: FieldScope,
    key: String,
    context: Rc<dyn EditorContext>,
) -> SetCallback {
    Rc::new(move |value: FieldValue| {
        let Some(definition) = definition.upgrade() else {
            debug!(step = %step_id, field = %key, "definition dropped; ignoring edit");
            return;
        };
        let stored = {
            let mut definition = definition.borrow_mut();
            match definition.find_step_mut(&step_id) {
                Some(step) => {
                    let fields: &mut IndexMap<String, StepField> = match scope {
                        FieldScope::Properties => &mut step.properties,
                        FieldScope::Parameters => &mut step.parameters,
                    };
                    store_value(&mut fields.entry(key.clone()).or_default().value, &value);
                    true
                }
                None => false,
            }
        };
        if stored {
            context.notify_properties_changed();
        } else {
            debug!(step = %step_id, field = %key, "step no longer in definition; dropping edit");
        }
    })
}
