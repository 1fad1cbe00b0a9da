//! Definition-wide settings panel.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use stepform_types::{Definition, FieldValue, ValueType};
use tracing::debug;

use super::{Editor, EditorContext, append_title, store_value};
use crate::container::build_collapsible_group;
use crate::dom::{Node, Role};
use crate::ids::new_id;
use crate::widgets::{
    FieldOptions, ObjectArrayOptions, ObjectFieldSchema, ObjectItemSchema, SetCallback, build_typed_widget, new_object_array_fields_container,
};

/// One field of a settings group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsField {
    pub key: &'static str,
    pub label: &'static str,
    /// Revealed by the field's hint toggle.
    pub help: &'static str,
    pub value_type: ValueType,
}

/// A collapsible group bound to the definition sub-object at `path`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsGroup {
    pub label: &'static str,
    pub help: &'static str,
    pub path: &'static [&'static str],
    pub fields: &'static [SettingsField],
}

const fn field(key: &'static str, label: &'static str, value_type: ValueType, help: &'static str) -> SettingsField {
    SettingsField {
        key,
        label,
        help,
        value_type,
    }
}

/// Root settings groups in render order.
pub const ROOT_SETTINGS: &[SettingsGroup] = &[
    SettingsGroup {
        label: "Authentication",
        help: "Credentials used when the flow connects to a remote driver or service.",
        path: &["authentication"],
        fields: &[
            field("username", "Username", ValueType::String, "User name sent with each request."),
            field("password", "Password", ValueType::String, "Password paired with the user name."),
            field("token", "Token", ValueType::String, "Bearer token; used instead of a user name and password when set."),
        ],
    },
    SettingsGroup {
        label: "Data Source",
        help: "External data the flow iterates over.",
        path: &["dataSource"],
        fields: &[
            field("type", "Type", ValueType::String, "Kind of data source, for example JSON or CSV."),
            field("source", "Source", ValueType::String, "Path, URL, or inline content of the data."),
        ],
    },
    SettingsGroup {
        label: "Driver Parameters",
        help: "Which driver runs the flow and the capabilities it is started with.",
        path: &["driverParameters"],
        fields: &[
            field("driver", "Driver", ValueType::String, "Driver implementation name."),
            field("driverBinaries", "Driver Binaries", ValueType::String, "Location of the driver executable or remote endpoint."),
            field("capabilities", "Capabilities", ValueType::KeyValue, "Capabilities every session must have."),
            field("firstMatch", "First Match", ValueType::ObjectArray, "Alternative capability sets; the first one the driver accepts is used."),
        ],
    },
    SettingsGroup {
        label: "Automation Settings",
        help: "Timeouts, parallelism, and response shape.",
        path: &["settings", "automationSettings"],
        fields: &[
            field("loadTimeout", "Load Timeout", ValueType::Number, "Milliseconds to wait for a page to load."),
            field("maxParallel", "Max Parallel", ValueType::Number, "Maximum number of data rows run at the same time."),
            field("searchTimeout", "Search Timeout", ValueType::Number, "Milliseconds to wait for an element to appear."),
            field("returnFlatResponse", "Return Flat Response", ValueType::Boolean, "Return step results as a flat list."),
            field("returnStructuredResponse", "Return Structured Response", ValueType::Boolean, "Return step results nested under their parent steps."),
        ],
    },
    SettingsGroup {
        label: "Environment Settings",
        help: "Environment selection and variables exposed to steps.",
        path: &["settings", "environmentSettings"],
        fields: &[
            field("defaultEnvironment", "Default Environment", ValueType::String, "Environment used when the run does not name one."),
            field("returnEnvironment", "Return Environment", ValueType::Boolean, "Include the resolved environment in the response."),
            field("environmentVariables", "Environment Variables", ValueType::KeyValue, "Variables steps can reference by name."),
        ],
    },
    SettingsGroup {
        label: "Exceptions Settings",
        help: "Whether step exceptions are included in the response.",
        path: &["settings", "exceptionsSettings"],
        fields: &[field("returnExceptions", "Return Exceptions", ValueType::Boolean, "Include step exceptions in the response.")],
    },
    SettingsGroup {
        label: "Queue Manager Settings",
        help: "Queue the run is dispatched through.",
        path: &["settings", "queueManagerSettings"],
        fields: &[
            field("type", "Type", ValueType::String, "Queue implementation name."),
            field("properties", "Properties", ValueType::KeyValue, "Connection properties passed to the queue."),
        ],
    },
    SettingsGroup {
        label: "Performance Settings",
        help: "Timing data collected per step.",
        path: &["settings", "performancePointsSettings"],
        fields: &[field(
            "returnPerformancePoints",
            "Return Performance Points",
            ValueType::Boolean,
            "Include per-step timing in the response.",
        )],
    },
    SettingsGroup {
        label: "Plugins Settings",
        help: "Where plugins are loaded from.",
        path: &["settings", "pluginsSettings"],
        fields: &[
            field("externalRepositories", "External Repositories", ValueType::Array, "Additional plugin repository locations."),
            field("forceRuleReference", "Force Rule Reference", ValueType::Boolean, "Require every step to reference a rule."),
        ],
    },
    SettingsGroup {
        label: "Screenshots Settings",
        help: "When screenshots are taken and how they are returned.",
        path: &["settings", "screenshotsSettings"],
        fields: &[
            field("outputFolder", "Output Folder", ValueType::String, "Folder screenshots are written to."),
            field("convertToBase64", "Convert To Base64", ValueType::Boolean, "Embed screenshots in the response as base64."),
            field("exceptionsOnly", "Exceptions Only", ValueType::Boolean, "Only take screenshots when a step fails."),
            field("returnScreenshots", "Return Screenshots", ValueType::Boolean, "Include screenshots in the response."),
        ],
    },
];

/// Builds the root settings panel. Each edit merges into the definition
/// sub-object of its group, creating it when absent, and then notifies the
/// context.
pub fn root_editor_provider(definition: &Rc<RefCell<Definition>>, context: Rc<dyn EditorContext>, is_readonly: bool) -> Editor {
    let panel = Node::new(Role::Panel);
    append_title(
        &panel,
        "Flow Settings",
        None,
        "Settings applied to the whole flow: credentials, driver, data source, and run behavior.",
    );

    let snapshot = definition.borrow();
    for group in ROOT_SETTINGS {
        let section = build_collapsible_group(&new_id(), group.label, group.help, "settings-group");
        panel.append_child(&section.root);
        let stored = snapshot.section(group.path);

        for settings_field in group.fields {
            let initial = stored
                .and_then(|values| values.get(settings_field.key))
                .cloned()
                .unwrap_or(JsonValue::Null);
            let options = FieldOptions::new(settings_field.label)
                .with_title(settings_field.help)
                .with_initial_value(initial.clone())
                .with_container(&section.controller_area);
            let callback = settings_callback(Rc::downgrade(definition), group.path, settings_field.key, context.clone());

            if settings_field.value_type == ValueType::ObjectArray {
                let options = ObjectArrayOptions::from_slots(options, "Match", &initial).with_template(capabilities_template());
                new_object_array_fields_container(options, callback);
            } else if build_typed_widget(settings_field.value_type, options, callback).is_none() {
                debug!(field = settings_field.key, "no widget for root settings field");
            }
        }
    }
    drop(snapshot);

    let editor = Editor::new(panel);
    if is_readonly {
        editor.set_readonly(true);
    }
    editor
}

fn settings_callback(
    definition: Weak<RefCell<Definition>>,
    path: &'static [&'static str],
    key: &'static str,
    context: Rc<dyn EditorContext>,
) -> SetCallback {
    Rc::new(move |value: FieldValue| {
        let Some(definition) = definition.upgrade() else {
            debug!(field = key, "definition dropped; ignoring edit");
            return;
        };
        {
            let mut definition = definition.borrow_mut();
            let Some(section) = definition.section_mut(path) else {
                debug!(field = key, "settings section unavailable; ignoring edit");
                return;
            };
            store_value(section.entry(key).or_insert(JsonValue::Null), &value);
        }
        context.notify_properties_changed();
    })
}

/// Shape of a new first-match entry.
fn capabilities_template() -> ObjectItemSchema {
    let fields: IndexMap<String, ObjectFieldSchema> = [
        ("browserName", "Browser Name"),
        ("browserVersion", "Browser Version"),
        ("platformName", "Platform Name"),
    ]
    .into_iter()
    .map(|(key, label)| (key.to_string(), ObjectFieldSchema::new(label, "STRING", JsonValue::Null)))
    .collect();
    let mut template = ObjectItemSchema::new();
    template.insert("capabilities".to_string(), fields);
    template
}
