//! Panels handed back to the flow designer.
//!
//! [`root_editor_provider`] renders the definition-wide settings and
//! [`step_editor_provider`] renders one step. Both write edits straight into
//! the caller's [`Definition`](stepform_types::Definition) and then notify the
//! caller through its [`EditorContext`].

mod root;
mod step;

pub use root::{ROOT_SETTINGS, SettingsField, SettingsGroup, root_editor_provider};
pub use step::step_editor_provider;

use serde_json::Value as JsonValue;
use stepform_types::FieldValue;

use crate::dom::{Node, Role};
use crate::hint;
use crate::ids::new_id;

/// Notification sink owned by the flow designer. Both calls are made
/// synchronously from inside an edit callback.
pub trait EditorContext {
    fn notify_properties_changed(&self);
    fn notify_name_changed(&self);
}

/// A built panel.
#[derive(Debug, Clone)]
pub struct Editor {
    panel: Node,
}

impl Editor {
    pub(crate) fn new(panel: Node) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &Node {
        &self.panel
    }

    /// Locks or unlocks every input without rebuilding the tree; used while
    /// a run is in progress. Fields declared readonly stay readonly when the
    /// lock is lifted.
    pub fn set_readonly(&self, readonly: bool) {
        self.panel.set_locked_tree(readonly);
    }
}

/// Appends a title block: the title text with a help toggle, an optional
/// subtitle, and an empty hint area.
pub(crate) fn append_title(panel: &Node, title: &str, subtitle: Option<&str>, help_text: &str) {
    let id = new_id();
    let block = Node::new(Role::Title).with_id(id.field_id());
    let heading = Node::new(Role::Label).with_id(id.label_id());
    heading.append_child(&Node::new(Role::LabelText).with_text(title));
    let icon = Node::new(Role::HintIcon).with_attribute("aria-label", "Show help");
    heading.append_child(&icon);
    block.append_child(&heading);

    if let Some(subtitle) = subtitle.filter(|text| !text.trim().is_empty()) {
        block.append_child(&Node::new(Role::Subtitle).with_text(subtitle));
    }

    let hint_area = Node::new(Role::Hint).with_id(id.hint_id());
    block.append_child(&hint_area);
    hint::attach_hint_to(&icon, &hint_area, help_text);
    panel.append_child(&block);
}

/// Writes an emitted value into its stored slot. Object-array patches merge
/// into the stored slot array; everything else replaces the slot.
pub(crate) fn store_value(slot: &mut JsonValue, value: &FieldValue) {
    match value {
        FieldValue::ObjectPatch(patch) => {
            if !slot.is_array() {
                *slot = JsonValue::Array(Vec::new());
            }
            if let JsonValue::Array(slots) = slot {
                patch.apply_to(slots);
            }
        }
        other => *slot = other.to_json(),
    }
}
