//! Identifier allocation for widget instances.

use std::fmt;

use uuid::Uuid;

/// Opaque, randomly drawn widget identifier.
///
/// Backed by a v4 UUID (122 random bits) and prefixed with a letter so the
/// id and its derived forms are valid selector tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WidgetId(String);

impl WidgetId {
    pub fn new() -> Self {
        WidgetId(format!("w{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn field_id(&self) -> String {
        format!("{}-field", self.0)
    }

    pub fn controller_id(&self) -> String {
        format!("{}-controller", self.0)
    }

    pub fn hint_id(&self) -> String {
        format!("{}-hint", self.0)
    }

    pub fn label_id(&self) -> String {
        format!("{}-label", self.0)
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Allocates a fresh identifier.
pub fn new_id() -> WidgetId {
    WidgetId::new()
}
