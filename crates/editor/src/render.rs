//! Plain-text outline of a node tree, for terminals and snapshot-style tests.

use std::fmt::Write;

use crate::dom::Node;

/// Renders one line per node, indented two spaces per level:
/// `role [name=value ...] "text" = value (readonly)`. Node ids are omitted
/// since they differ on every build.
pub fn render_outline(root: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &Node, depth: usize) {
    let _ = write!(out, "{:indent$}{}", "", node.role().as_str(), indent = depth * 2);
    let attributes = node.attributes();
    if !attributes.is_empty() {
        let rendered: Vec<String> = attributes.iter().map(|(name, value)| format!("{name}={value:?}")).collect();
        let _ = write!(out, " [{}]", rendered.join(" "));
    }
    let text = node.text();
    if !text.is_empty() {
        let _ = write!(out, " {text:?}");
    }
    let value = node.value();
    if !value.is_empty() {
        let _ = write!(out, " = {value:?}");
    }
    if node.is_readonly() {
        out.push_str(" (readonly)");
    }
    out.push('\n');
    for child in node.children() {
        write_node(out, &child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Role;

    #[test]
    fn outline_indents_children() {
        let panel = Node::new(Role::Panel);
        let input = Node::new(Role::Input).with_attribute("type", "text");
        input.set_value("hello");
        input.set_readonly(true);
        panel.append_child(&Node::new(Role::Title).with_text("Click"));
        panel.append_child(&input);

        assert_eq!(
            render_outline(&panel),
            "panel\n  title \"Click\"\n  input [type=\"text\"] = \"hello\" (readonly)\n"
        );
    }
}
