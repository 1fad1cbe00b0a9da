//! Field skeletons shared by every widget kind.
//!
//! A labeled field is `label area` + `hint area` + `controller area`, in that
//! order. Widgets only ever insert into the controller area; the label and
//! hint areas belong to this module and [`crate::hint`].

use crate::dom::{EventKind, Node, Role};
use crate::hint;
use crate::ids::WidgetId;

/// Attribute carrying the caller-supplied role of an unlabeled field.
pub const DATA_ROLE: &str = "data-role";

#[derive(Debug, Clone)]
pub struct ContainerSkeleton {
    pub id: WidgetId,
    /// Outermost node; this is what callers place in the visible tree.
    pub root: Node,
    pub label_area: Option<Node>,
    pub hint_area: Option<Node>,
    pub controller_area: Node,
}

impl ContainerSkeleton {
    /// The help-toggle affordance inside the label area, when there is one.
    pub fn hint_icon(&self) -> Option<Node> {
        self.label_area.as_ref()?.find_by_role(Role::HintIcon)
    }
}

/// Builds a labeled field with a working help toggle.
pub fn build_field(id: &WidgetId, label: &str, help_text: &str) -> ContainerSkeleton {
    let root = Node::new(Role::Field).with_id(id.field_id());
    let label_area = build_label_area(id, Role::Label, label);
    let hint_area = Node::new(Role::Hint).with_id(id.hint_id());
    let controller_area = Node::new(Role::Controller).with_id(id.controller_id());

    root.append_child(&label_area);
    root.append_child(&hint_area);
    root.append_child(&controller_area);

    let skeleton = ContainerSkeleton {
        id: id.clone(),
        root,
        label_area: Some(label_area),
        hint_area: Some(hint_area),
        controller_area,
    };
    hint::attach_hint(&skeleton, help_text);
    skeleton
}

/// Builds a bare controller area tagged with `role`, used for anonymous
/// nested groups such as one row of an array.
pub fn build_unlabeled_field(id: &WidgetId, role: &str) -> ContainerSkeleton {
    let controller_area = Node::new(Role::Controller)
        .with_id(id.controller_id())
        .with_attribute(DATA_ROLE, role);
    ContainerSkeleton {
        id: id.clone(),
        root: controller_area.clone(),
        label_area: None,
        hint_area: None,
        controller_area,
    }
}

/// Wraps an unlabeled field in a disclosure whose summary always shows the
/// label. Activating the summary toggles the `open` attribute.
pub fn build_collapsible_group(id: &WidgetId, label: &str, help_text: &str, role: &str) -> ContainerSkeleton {
    let root = Node::new(Role::Group)
        .with_id(id.field_id())
        .with_attribute("open", "false");
    let summary = build_label_area(id, Role::Summary, label);
    let hint_area = Node::new(Role::Hint).with_id(id.hint_id());
    let inner = build_unlabeled_field(id, role);

    root.append_child(&summary);
    root.append_child(&hint_area);
    root.append_child(&inner.root);

    let group = root.downgrade();
    summary.add_listener(EventKind::Activate, move |_| {
        let Some(group) = group.upgrade() else {
            return;
        };
        let open = group.attribute("open").is_some_and(|value| value == "true");
        group.set_attribute("open", if open { "false" } else { "true" });
    });

    let skeleton = ContainerSkeleton {
        id: id.clone(),
        root,
        label_area: Some(summary),
        hint_area: Some(hint_area),
        controller_area: inner.controller_area,
    };
    hint::attach_hint(&skeleton, help_text);
    skeleton
}

fn build_label_area(id: &WidgetId, role: Role, label: &str) -> Node {
    let area = Node::new(role).with_id(id.label_id());
    area.append_child(&Node::new(Role::LabelText).with_text(label));
    area.append_child(&Node::new(Role::HintIcon).with_attribute("aria-label", "Show help"));
    area
}
