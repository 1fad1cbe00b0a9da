//! Click-to-reveal help text for fields and section titles.

use crate::container::ContainerSkeleton;
use crate::dom::{EventKind, Node, Role};

/// Wires the container's hint icon to toggle `hint_text` under its hint area.
/// Containers without a label or hint area are left untouched.
pub fn attach_hint(container: &ContainerSkeleton, hint_text: &str) {
    let (Some(icon), Some(area)) = (container.hint_icon(), container.hint_area.as_ref()) else {
        return;
    };
    attach_hint_to(&icon, area, hint_text);
}

/// Wires an arbitrary icon node to toggle `hint_text` under `hint_area`.
pub fn attach_hint_to(icon: &Node, hint_area: &Node, hint_text: &str) {
    let area = hint_area.downgrade();
    let text = hint_text.to_string();
    icon.add_listener(EventKind::Activate, move |event| {
        event.stop_propagation();
        if let Some(area) = area.upgrade() {
            toggle_hint(&area, &text);
        }
    });
}

/// Removes the hint text node if present, otherwise appends one. Returns
/// whether the hint is now visible.
pub fn toggle_hint(hint_area: &Node, hint_text: &str) -> bool {
    if let Some(existing) = hint_area.find_by_role(Role::HintText) {
        existing.remove();
        return false;
    }
    hint_area.append_child(&Node::new(Role::HintText).with_text(hint_text));
    true
}
