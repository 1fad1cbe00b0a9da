use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::json;
use stepform_editor::{EditorContext, EditorError, Node, ROOT_SETTINGS, Role, root_editor_provider, step_editor_provider};
use stepform_registry::{CacheManifest, ManifestCache};
use stepform_types::{Definition, StepField};

#[derive(Default)]
struct CountingContext {
    properties: Cell<usize>,
    names: Cell<usize>,
}

impl EditorContext for CountingContext {
    fn notify_properties_changed(&self) {
        self.properties.set(self.properties.get() + 1);
    }

    fn notify_name_changed(&self) {
        self.names.set(self.names.get() + 1);
    }
}

fn definition() -> Rc<RefCell<Definition>> {
    let definition: Definition = serde_json::from_value(json!({
        "properties": {
            "authentication": { "username": "admin" },
            "driverParameters": {
                "firstMatch": [{ "capabilities": { "browserName": "chrome" } }]
            }
        },
        "sequence": [
            {
                "id": "click-1",
                "name": "Click login",
                "type": "Click",
                "properties": {
                    "Rules": { "type": "String", "value": "hidden" },
                    "Argument": { "type": "String", "value": "moved" },
                    "OnElement": { "type": "Locator", "value": "Xpath", "optionsList": [
                        { "name": "Xpath", "description": "By XPath" },
                        { "name": "Id", "description": "By id" }
                    ] },
                    "Alias": { "type": "Macros", "value": "" }
                },
                "parameters": {
                    "Until": { "type": "Number", "value": 3 },
                    "Force": { "type": "Bool", "value": "undefined" }
                }
            },
            {
                "id": "loop",
                "type": "Loop",
                "sequence": [{ "id": "nested", "type": "Wait", "properties": { "Argument": { "type": "String", "value": "500" } } }]
            }
        ]
    }))
    .expect("definition");
    Rc::new(RefCell::new(definition))
}

fn cache() -> ManifestCache {
    let manifest: CacheManifest = serde_json::from_value(json!({
        "lists": { "Macros": { "now": { "summary": ["Current time"] } } },
        "plugins": { "Click": { "category": "User Interface", "summary": ["Clicks", "an element"] } }
    }))
    .expect("manifest");
    ManifestCache::from_manifest(manifest)
}

fn labels(node: &Node) -> Vec<String> {
    node.find_all(&|candidate: &Node| candidate.role() == Role::Label || candidate.role() == Role::Summary)
        .iter()
        .filter_map(|label| label.find_by_role(Role::LabelText))
        .map(|text| text.text())
        .collect()
}

fn field(panel: &Node, label: &str) -> Node {
    panel
        .find_all_by_role(Role::Field)
        .into_iter()
        .find(|field| {
            field
                .find_by_role(Role::Label)
                .and_then(|area| area.find_by_role(Role::LabelText))
                .is_some_and(|text| text.text() == label)
        })
        .unwrap_or_else(|| panic!("no field labelled {label}"))
}

#[test]
fn root_editor_renders_groups_in_order() {
    let context = Rc::new(CountingContext::default());
    let editor = root_editor_provider(&definition(), context, false);
    let groups: Vec<String> = editor
        .panel()
        .children()
        .iter()
        .filter(|node| node.role() == Role::Group)
        .filter_map(|group| group.find_by_role(Role::Summary)?.find_by_role(Role::LabelText))
        .map(|text| text.text())
        .collect();
    let expected: Vec<String> = ROOT_SETTINGS.iter().map(|group| group.label.to_string()).collect();
    assert_eq!(groups, expected);
    assert_eq!(groups.len(), 10);
}

#[test]
fn root_edits_create_sub_objects_and_notify() {
    let definition = definition();
    let context = Rc::new(CountingContext::default());
    let editor = root_editor_provider(&definition, context.clone(), false);

    let username = field(editor.panel(), "Username").find_by_role(Role::TextArea).expect("username");
    assert_eq!(username.value(), "admin");
    username.user_input("root");

    let timeout = field(editor.panel(), "Load Timeout").find_by_role(Role::Input).expect("timeout");
    timeout.user_input("30000");
    let screenshots = field(editor.panel(), "Return Screenshots").find_by_role(Role::Select).expect("switch");
    screenshots.user_input("true");

    let stored = definition.borrow();
    assert_eq!(stored.section(&["authentication"]).and_then(|section| section.get("username")), Some(&json!("root")));
    assert_eq!(
        stored.section(&["settings", "automationSettings"]).and_then(|section| section.get("loadTimeout")),
        Some(&json!("30000"))
    );
    assert_eq!(
        stored.section(&["settings", "screenshotsSettings"]).and_then(|section| section.get("returnScreenshots")),
        Some(&json!("true"))
    );
    assert_eq!(context.properties.get(), 3);
}

#[test]
fn root_first_match_merges_patches_into_slots() {
    let definition = definition();
    let context = Rc::new(CountingContext::default());
    let editor = root_editor_provider(&definition, context, false);
    let first_match = field(editor.panel(), "First Match");

    let remove = first_match
        .find_first(&|node: &Node| node.attribute("data-action").as_deref() == Some("remove"))
        .expect("remove");
    remove.activate();
    let add = first_match
        .find_first(&|node: &Node| node.attribute("data-action").as_deref() == Some("add"))
        .expect("add");
    add.activate();
    let added = first_match.find_by_role(Role::TextArea).expect("new browserName");
    added.user_input("firefox");

    let stored = definition.borrow();
    let slots = stored
        .section(&["driverParameters"])
        .and_then(|section| section.get("firstMatch"))
        .cloned()
        .expect("firstMatch");
    assert_eq!(slots, json!([null, { "capabilities": { "browserName": "firefox" } }]));
}

#[test]
fn readonly_root_editor_can_be_reenabled() {
    let definition = definition();
    let context = Rc::new(CountingContext::default());
    let editor = root_editor_provider(&definition, context.clone(), true);
    let username = field(editor.panel(), "Username").find_by_role(Role::TextArea).expect("username");

    assert!(!username.user_input("blocked"));
    editor.set_readonly(false);
    assert!(username.user_input("allowed"));
    editor.set_readonly(true);
    assert!(!username.user_input("blocked again"));
    assert_eq!(context.properties.get(), 1);
}

#[test]
fn root_fields_reveal_their_help_text() {
    let editor = root_editor_provider(&definition(), Rc::new(CountingContext::default()), false);
    let username = field(editor.panel(), "Username");
    username.find_by_role(Role::HintIcon).expect("hint icon").activate();
    assert_eq!(
        username.find_by_role(Role::HintText).map(|node| node.text()).as_deref(),
        Some("User name sent with each request.")
    );
    assert!(ROOT_SETTINGS.iter().flat_map(|group| group.fields).all(|field| !field.help.trim().is_empty()));
}

#[test]
fn run_lock_does_not_unlock_declared_readonly_fields() {
    let definition = definition();
    {
        let mut stored = definition.borrow_mut();
        let step = stored.find_step_mut("click-1").expect("step");
        let locked: StepField = serde_json::from_value(json!({ "type": "String", "value": "fixed", "readonly": true })).expect("field");
        step.properties.insert("Locked".into(), locked);
    }
    let context = Rc::new(CountingContext::default());
    let step = definition.borrow().find_step("click-1").cloned().expect("step");
    let editor = step_editor_provider(&step, context.clone(), &definition, &cache()).expect("editor");
    let locked = field(editor.panel(), "Locked").find_by_role(Role::TextArea).expect("locked");
    let until = field(editor.panel(), "Until").find_by_role(Role::Input).expect("until");
    assert!(!locked.user_input("edited"));

    editor.set_readonly(true);
    assert!(!until.user_input("4"));
    editor.set_readonly(false);

    assert!(!locked.user_input("edited"));
    assert!(until.user_input("4"));
    let stored = definition.borrow();
    let step = stored.find_step("click-1").expect("step");
    assert_eq!(step.properties["Locked"].value, json!("fixed"));
    assert_eq!(step.parameters["Until"].value, json!("4"));
    assert_eq!(context.properties.get(), 1);
}

#[test]
fn step_editor_orders_and_filters_fields() {
    let definition = definition();
    let step = definition.borrow().find_step("click-1").cloned().expect("step");
    let editor = step_editor_provider(&step, Rc::new(CountingContext::default()), &definition, &cache()).expect("editor");

    let panel = editor.panel();
    let title = panel.find_by_role(Role::Title).expect("title");
    assert_eq!(title.find_by_role(Role::LabelText).map(|node| node.text()).as_deref(), Some("Click login"));
    assert_eq!(title.find_by_role(Role::Subtitle).map(|node| node.text()).as_deref(), Some("User Interface"));

    let all = labels(panel);
    assert_eq!(all, vec!["Click login", "Name", "Properties", "Alias", "OnElement", "Parameters", "Force", "Until"]);
}

#[test]
fn argument_stays_when_step_has_no_parameters() {
    let definition = definition();
    let step = definition.borrow().find_step("nested").cloned().expect("nested step");
    let editor = step_editor_provider(&step, Rc::new(CountingContext::default()), &definition, &cache()).expect("editor");
    assert!(labels(editor.panel()).contains(&"Argument".to_string()));
}

#[test]
fn step_edits_write_back_and_notify() {
    let definition = definition();
    let context = Rc::new(CountingContext::default());
    let step = definition.borrow().find_step("click-1").cloned().expect("step");
    let editor = step_editor_provider(&step, context.clone(), &definition, &cache()).expect("editor");
    let panel = editor.panel();

    field(panel, "Name").find_by_role(Role::Input).expect("name").user_input("Click submit");
    field(panel, "OnElement").find_by_role(Role::Select).expect("locator").user_input("Id");
    field(panel, "Alias").find_by_role(Role::DataList).expect("alias datalist");
    field(panel, "Force").find_by_role(Role::Select).expect("force").user_input("true");
    field(panel, "Until").find_by_role(Role::Input).expect("until").user_input("5");

    let stored = definition.borrow();
    let step = stored.find_step("click-1").expect("step");
    assert_eq!(step.name, "Click submit");
    assert_eq!(step.properties["OnElement"].value, json!("Id"));
    assert_eq!(step.parameters["Force"].value, json!("true"));
    assert_eq!(step.parameters["Until"].value, json!("5"));
    assert_eq!(context.names.get(), 1);
    assert_eq!(context.properties.get(), 3);
}

#[test]
fn edits_for_a_removed_step_are_dropped() {
    let definition = definition();
    let context = Rc::new(CountingContext::default());
    let step = definition.borrow().find_step("click-1").cloned().expect("step");
    let editor = step_editor_provider(&step, context.clone(), &definition, &cache()).expect("editor");

    definition.borrow_mut().sequence.retain(|candidate| candidate.id != "click-1");
    field(editor.panel(), "Until").find_by_role(Role::Input).expect("until").user_input("9");
    assert_eq!(context.properties.get(), 0);
}

#[test]
fn malformed_option_source_aborts_the_build() {
    let definition = definition();
    {
        let mut stored = definition.borrow_mut();
        let step = stored.find_step_mut("click-1").expect("step");
        step.properties.get_mut("OnElement").expect("field").options_list = Some(json!({ "name": "Xpath" }));
    }
    let step = definition.borrow().find_step("click-1").cloned().expect("step");
    let result = step_editor_provider(&step, Rc::new(CountingContext::default()), &definition, &cache());
    assert!(matches!(result, Err(EditorError::InvalidOptionSource { ref key, .. }) if key == "OnElement"));
}

#[test]
fn unknown_step_is_rejected() {
    let definition = definition();
    let mut step = definition.borrow().find_step("click-1").cloned().expect("step");
    step.id = "missing".into();
    let result = step_editor_provider(&step, Rc::new(CountingContext::default()), &definition, &cache());
    assert!(matches!(result, Err(EditorError::StepNotFound(id)) if id == "missing"));
}
