//! Flow-designer documents: the root definition and its steps.
//!
//! The editor reads these to build panels and its callbacks write edits back
//! into them. Steps may nest (container steps carry a `sequence`, branching
//! steps carry named `branches`), so lookups walk the whole tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{FieldDescriptor, OptionSource, OptionSourceError};

/// Root document owned by the flow designer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    /// Root-level settings, grouped into sub-objects (`authentication`, `settings`, ...).
    #[serde(default)]
    pub properties: Map<String, JsonValue>,
    /// Top-level steps in execution order.
    #[serde(default)]
    pub sequence: Vec<Step>,
}

impl Definition {
    /// Finds a step by id anywhere in the tree.
    pub fn find_step(&self, id: &str) -> Option<&Step> {
        find_in(&self.sequence, id)
    }

    /// Finds a step by id anywhere in the tree, mutably.
    pub fn find_step_mut(&mut self, id: &str) -> Option<&mut Step> {
        find_in_mut(&mut self.sequence, id)
    }

    /// Returns the settings object at `path`, creating empty objects along the
    /// way. A non-object value in the way is replaced.
    pub fn section_mut(&mut self, path: &[&str]) -> Option<&mut Map<String, JsonValue>> {
        object_at_path(&mut self.properties, path)
    }

    /// Returns the settings object at `path` when it exists.
    pub fn section(&self, path: &[&str]) -> Option<&Map<String, JsonValue>> {
        let mut current = &self.properties;
        for segment in path {
            current = current.get(*segment)?.as_object()?;
        }
        Some(current)
    }
}

fn object_at_path<'a>(root: &'a mut Map<String, JsonValue>, path: &[&str]) -> Option<&'a mut Map<String, JsonValue>> {
    let Some((head, rest)) = path.split_first() else {
        return Some(root);
    };
    let entry = root
        .entry(head.to_string())
        .or_insert_with(|| JsonValue::Object(Map::new()));
    if !entry.is_object() {
        *entry = JsonValue::Object(Map::new());
    }
    object_at_path(entry.as_object_mut()?, rest)
}

fn find_in<'a>(steps: &'a [Step], id: &str) -> Option<&'a Step> {
    for step in steps {
        if step.id == id {
            return Some(step);
        }
        if let Some(found) = find_in(&step.sequence, id) {
            return Some(found);
        }
        for branch in step.branches.values() {
            if let Some(found) = find_in(branch, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_in_mut<'a>(steps: &'a mut [Step], id: &str) -> Option<&'a mut Step> {
    for step in steps.iter_mut() {
        if step.id == id {
            return Some(step);
        }
        if let Some(found) = find_in_mut(&mut step.sequence, id) {
            return Some(found);
        }
        for branch in step.branches.values_mut() {
            if let Some(found) = find_in_mut(branch, id) {
                return Some(found);
            }
        }
    }
    None
}

/// A single step in the flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    /// Display name shown on the canvas and in the editor title.
    #[serde(default)]
    pub name: String,
    /// Plugin identifier (for example `SendKeys`).
    #[serde(default, rename = "type")]
    pub step_type: String,
    /// Designer component kind (`task`, `container`, `switch`).
    #[serde(default)]
    pub component_type: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, StepField>,
    #[serde(default)]
    pub parameters: IndexMap<String, StepField>,
    /// Child steps of a container step.
    #[serde(default)]
    pub sequence: Vec<Step>,
    /// Named child sequences of a branching step.
    #[serde(default)]
    pub branches: IndexMap<String, Vec<Step>>,
}

impl Step {
    /// Name used for titles: the step name, or the plugin type when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() { &self.step_type } else { &self.name }
    }
}

/// A declared property or parameter of a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepField {
    #[serde(default, rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub value: JsonValue,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Either a cache key (string) or an explicit option array; kept raw so a
    /// malformed source surfaces when the editor is built.
    #[serde(default)]
    pub options_list: Option<JsonValue>,
    #[serde(default)]
    pub readonly: bool,
}

impl StepField {
    /// Builds the descriptor the editor uses for this field.
    pub fn descriptor(&self, key: &str) -> Result<FieldDescriptor, OptionSourceError> {
        let option_source = match &self.options_list {
            None | Some(JsonValue::Null) => None,
            Some(raw) => Some(OptionSource::from_json(raw)?),
        };
        let label = self.label.clone().unwrap_or_else(|| key.to_string());
        Ok(FieldDescriptor::new(key, self.field_type.clone(), self.value.clone())
            .with_label(label)
            .with_help_text(self.description.clone().unwrap_or_default())
            .with_option_source(option_source)
            .with_readonly(self.readonly))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_definition() -> Definition {
        serde_json::from_value(json!({
            "sequence": [
                { "id": "a", "type": "GoToUrl" },
                {
                    "id": "loop",
                    "type": "Loop",
                    "componentType": "container",
                    "sequence": [{ "id": "b", "type": "Click" }]
                },
                {
                    "id": "branch",
                    "type": "If",
                    "componentType": "switch",
                    "branches": { "true": [{ "id": "c", "type": "Wait" }], "false": [] }
                }
            ]
        }))
        .expect("deserialize definition")
    }

    #[test]
    fn finds_nested_steps() {
        let mut definition = nested_definition();
        assert!(definition.find_step("b").is_some());
        assert!(definition.find_step("missing").is_none());

        let step = definition.find_step_mut("c").expect("branch child");
        step.name = "renamed".into();
        assert_eq!(definition.find_step("c").map(Step::display_name), Some("renamed"));
    }

    #[test]
    fn section_mut_creates_missing_objects() {
        let mut definition = Definition::default();
        definition.properties.insert("settings".into(), json!("not an object"));
        definition
            .section_mut(&["settings", "automationSettings"])
            .expect("section")
            .insert("loadTimeout".into(), json!("60000"));

        assert_eq!(
            definition.section(&["settings", "automationSettings"]).and_then(|section| section.get("loadTimeout")),
            Some(&json!("60000"))
        );
    }

    #[test]
    fn step_field_descriptor_carries_metadata() {
        let field: StepField = serde_json::from_value(json!({
            "type": "Bool",
            "value": "true",
            "description": "Wait for the element",
            "readonly": true
        }))
        .expect("deserialize field");
        let descriptor = field.descriptor("WaitFor").expect("descriptor");
        assert_eq!(descriptor.label, "WaitFor");
        assert_eq!(descriptor.help_text, "Wait for the element");
        assert!(descriptor.readonly);
        assert_eq!(descriptor.value_type, crate::ValueType::Boolean);
    }

    #[test]
    fn step_field_descriptor_rejects_bad_option_source() {
        let field = StepField {
            field_type: "Locator".into(),
            options_list: Some(json!(true)),
            ..Default::default()
        };
        assert!(field.descriptor("Locator").is_err());
    }
}
