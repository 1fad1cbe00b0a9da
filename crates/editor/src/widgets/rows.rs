//! Growable rows shared by the array and key/value widgets.
//!
//! The controller area holds one primary row with an add control and any
//! number of secondary rows, each with its own remove control. Listeners hold
//! weak handles to the controller and rows, so a dropped panel is never kept
//! alive by its own buttons.

use std::rc::Rc;

use tracing::debug;

use crate::dom::{EventKind, Node, Role};

/// Marks the row that cannot be removed.
pub(crate) const PRIMARY: &str = "data-primary";
/// Names what a row button does.
pub(crate) const ACTION: &str = "data-action";

/// Builds the inputs of one row from its seed values.
pub(crate) type CellFactory = Rc<dyn Fn(&[String]) -> Vec<Node>>;
/// Re-reads every row under the controller and emits the full current state.
pub(crate) type Rescan = Rc<dyn Fn(&Node)>;

#[derive(Clone)]
pub(crate) struct RowBehavior {
    pub factory: CellFactory,
    pub rescan: Rescan,
}

impl RowBehavior {
    /// Renders the primary row from `first` and one secondary row per entry of
    /// `rest`, then rescans on any input inside the controller.
    pub(crate) fn populate(&self, controller: &Node, first: &[String], rest: &[Vec<String>]) {
        controller.append_child(&self.build_row(first, true, controller));
        for seed in rest {
            controller.append_child(&self.build_row(seed, false, controller));
        }

        let weak_controller = controller.downgrade();
        let rescan = self.rescan.clone();
        controller.add_listener(EventKind::Input, move |_| {
            if let Some(controller) = weak_controller.upgrade() {
                rescan(&controller);
            }
        });
    }

    fn build_row(&self, seed: &[String], primary: bool, controller: &Node) -> Node {
        let row = Node::new(Role::Row);
        for cell in (self.factory)(seed) {
            row.append_child(&cell);
        }

        let weak_controller = controller.downgrade();
        if primary {
            row.set_attribute(PRIMARY, "true");
            let button = Node::new(Role::Button).with_attribute(ACTION, "add").with_text("+");
            let behavior = self.clone();
            button.add_listener(EventKind::Activate, move |_| {
                let Some(controller) = weak_controller.upgrade() else {
                    debug!("row controller is gone; ignoring add");
                    return;
                };
                controller.append_child(&behavior.build_row(&[], false, &controller));
            });
            row.append_child(&button);
        } else {
            let button = Node::new(Role::Button).with_attribute(ACTION, "remove").with_text("−");
            let weak_row = row.downgrade();
            let rescan = self.rescan.clone();
            button.add_listener(EventKind::Activate, move |_| {
                let (Some(row), Some(controller)) = (weak_row.upgrade(), weak_controller.upgrade()) else {
                    debug!("row or controller is gone; ignoring remove");
                    return;
                };
                row.remove();
                rescan(&controller);
            });
            row.append_child(&button);
        }
        row
    }
}

/// Direct row children of a controller, in visual order.
pub(crate) fn rows_of(controller: &Node) -> Vec<Node> {
    controller
        .children()
        .into_iter()
        .filter(|child| child.role() == Role::Row)
        .collect()
}

/// The button in `row` performing `action`.
pub(crate) fn row_button(row: &Node, action: &str) -> Option<Node> {
    row.find_first(&|node: &Node| node.role() == Role::Button && node.attribute(ACTION).as_deref() == Some(action))
}
