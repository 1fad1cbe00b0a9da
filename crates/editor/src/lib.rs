//! Schema-driven property editors.
//!
//! Given field descriptors taken from a flow definition, this crate builds
//! live editor widgets into a retained [`dom::Node`] tree and keeps the
//! definition in sync with what the user types. Hosts materialize the tree
//! and deliver user activity back through the node API.
//!
//! Entry points are [`root_editor_provider`] and [`step_editor_provider`];
//! the widget builders under [`widgets`] and the [`resolver`] can also be
//! used directly.

pub mod composer;
pub mod container;
pub mod dom;
pub mod error;
pub mod hint;
pub mod ids;
pub mod render;
pub mod resolver;
pub mod widgets;

pub use composer::{Editor, EditorContext, ROOT_SETTINGS, root_editor_provider, step_editor_provider};
pub use container::{ContainerSkeleton, build_collapsible_group, build_field, build_unlabeled_field};
pub use dom::{Event, EventKind, Node, Role, WeakNode};
pub use error::EditorError;
pub use ids::{WidgetId, new_id};
pub use render::render_outline;
pub use resolver::{WidgetKind, build_widget, resolve_kind};
pub use widgets::{FieldOptions, SetCallback, WidgetHandle};
