use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::{Value as JsonValue, json};
use stepform_editor::widgets::{new_array_field, new_key_value_field, new_number_field, new_switch_field, new_text_field};
use stepform_editor::{FieldOptions, Node, Role, SetCallback, WidgetHandle, WidgetKind, build_widget, render_outline, resolve_kind};
use stepform_registry::{CacheManifest, ManifestCache};
use stepform_types::{FieldDescriptor, FieldValue, OptionEntry, OptionSource};

fn recorder() -> (SetCallback, Rc<RefCell<Vec<FieldValue>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    (Rc::new(move |value: FieldValue| sink.borrow_mut().push(value)), seen)
}

fn rows(handle: &WidgetHandle) -> Vec<Node> {
    handle
        .skeleton
        .controller_area
        .children()
        .into_iter()
        .filter(|node| node.role() == Role::Row)
        .collect()
}

fn action(row: &Node, name: &str) -> Node {
    row.find_first(&|node: &Node| node.role() == Role::Button && node.attribute("data-action").as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no {name} button"))
}

fn part(row: &Node, name: &str) -> Node {
    row.find_first(&|node: &Node| node.attribute("data-part").as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no {name} input"))
}

fn list(values: &[&str]) -> FieldValue {
    FieldValue::List(values.iter().map(|value| value.to_string()).collect())
}

#[test]
fn array_remove_then_edit_reports_remaining_rows() {
    let (callback, seen) = recorder();
    let handle = new_array_field(FieldOptions::new("Items").with_initial_value(json!(["a", "b"])), callback);

    let current = rows(&handle);
    assert_eq!(current.len(), 2);
    let primary = current[0].find_by_role(Role::Input).expect("primary input");
    assert_eq!(primary.value(), "a");
    assert_eq!(current[1].find_by_role(Role::Input).map(|node| node.value()).as_deref(), Some("b"));

    action(&current[1], "remove").activate();
    primary.user_input("aa");

    assert_eq!(seen.borrow().last(), Some(&list(&["aa"])));
}

#[test]
fn key_value_add_then_clear_key() {
    let (callback, seen) = recorder();
    let handle = new_key_value_field(FieldOptions::new("Variables").with_initial_value(json!({ "x": "1" })), callback);

    action(&rows(&handle)[0], "add").activate();
    let added = rows(&handle)[1].clone();
    part(&added, "key").user_input("y");
    part(&added, "value").user_input("2");

    let expected: IndexMap<String, String> = [("x", "1"), ("y", "2")].into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    assert_eq!(seen.borrow().last(), Some(&FieldValue::Map(expected)));

    part(&rows(&handle)[0], "key").user_input("");
    let expected: IndexMap<String, String> = [("y".to_string(), "2".to_string())].into_iter().collect();
    assert_eq!(seen.borrow().last(), Some(&FieldValue::Map(expected)));
}

#[test]
fn bool_descriptor_without_value_starts_false() {
    let cache = ManifestCache::empty();
    let descriptor = FieldDescriptor::new("Enabled", "BOOL", JsonValue::Null);
    assert_eq!(resolve_kind(&descriptor, &cache), WidgetKind::Switch);

    let (callback, _) = recorder();
    let handle = build_widget(&descriptor, &cache, None, callback);
    let select = handle.control(Role::Select).expect("select");
    assert_eq!(select.value(), "false");
    let labels: Vec<_> = select.find_all_by_role(Role::Option).iter().map(Node::text).collect();
    assert_eq!(labels, vec!["True", "False"]);
}

#[test]
fn array_state_tracks_rows_through_mixed_interactions() {
    let (callback, seen) = recorder();
    let handle = new_array_field(FieldOptions::new("Items"), callback);
    let add = action(&rows(&handle)[0], "add");

    for _ in 0..4 {
        add.activate();
    }
    let inputs: Vec<Node> = rows(&handle).iter().filter_map(|row| row.find_by_role(Role::Input)).collect();
    inputs[0].user_input(" one ");
    inputs[1].user_input("two");
    inputs[2].user_input("");
    inputs[3].user_input("four");
    inputs[4].user_input("five");
    action(&rows(&handle)[2], "remove").activate();
    action(&rows(&handle)[1], "remove").activate();
    inputs[4].user_input(" five! ");

    let expected: Vec<String> = rows(&handle)
        .iter()
        .filter_map(|row| row.find_by_role(Role::Input))
        .map(|input| input.value().trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();
    assert_eq!(expected, vec!["one", "four", "five!"]);
    assert_eq!(seen.borrow().last(), Some(&FieldValue::List(expected)));
}

#[test]
fn building_twice_yields_equivalent_widgets() {
    let build = || {
        let (callback, seen) = recorder();
        let handle = new_text_field(FieldOptions::new("Url").with_title("Page to open").with_initial_value(json!("https://a")), callback);
        (handle, seen)
    };
    let (first, first_seen) = build();
    let (second, second_seen) = build();

    assert_ne!(first.id, second.id);
    assert_eq!(render_outline(&first.mount), render_outline(&second.mount));

    first.control(Role::Input).expect("input").user_input("https://b");
    second.control(Role::Input).expect("input").user_input("https://b");
    assert_eq!(*first_seen.borrow(), *second_seen.borrow());
}

#[test]
fn switch_and_number_normalize_missing_values() {
    for initial in [JsonValue::Null, json!("undefined"), json!("NaN"), json!(false), json!("")] {
        let (callback, _) = recorder();
        let handle = new_switch_field(FieldOptions::new("Flag").with_initial_value(initial), callback);
        assert_eq!(handle.control(Role::Select).map(|node| node.value()).as_deref(), Some("false"));
    }

    let (callback, _) = recorder();
    let handle = new_number_field(FieldOptions::new("Timeout").with_initial_value(json!("ten")), callback);
    assert_eq!(handle.control(Role::Input).map(|node| node.value()).as_deref(), Some(""));
}

#[test]
fn cached_list_type_wins_over_explicit_options() {
    let manifest: CacheManifest = serde_json::from_value(json!({
        "lists": { "Elements": { "button": { "summary": ["Login button"] } } }
    }))
    .expect("manifest");
    let cache = ManifestCache::from_manifest(manifest);

    let entries = vec![OptionEntry::new("z", ""), OptionEntry::new("a", ""), OptionEntry::new("m", "")];
    for rotation in 0..entries.len() {
        let mut rotated = entries.clone();
        rotated.rotate_left(rotation);
        let descriptor = FieldDescriptor::new("Element", "elements", json!("button")).with_option_source(Some(OptionSource::List(rotated)));
        assert_eq!(resolve_kind(&descriptor, &cache), WidgetKind::CachedList);
    }
}
