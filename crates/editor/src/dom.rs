//! Retained node tree the editor builds into.
//!
//! This is the whole surface the engine needs from a visual host: create a
//! node of a role, set attributes/text/value, append and remove children,
//! query descendants, and register listeners. A host materializes the tree
//! and feeds user activity back through [`Node::user_input`] and
//! [`Node::activate`].
//!
//! Everything here is single-threaded. Nodes are reference counted; children
//! hold a weak link to their parent, and listeners are expected to capture
//! [`WeakNode`] handles for anything above them so a panel can be dropped
//! without leaking.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;

/// What a node represents to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Panel,
    Title,
    Subtitle,
    Field,
    Label,
    LabelText,
    HintIcon,
    Hint,
    HintText,
    Controller,
    Input,
    TextArea,
    Select,
    Option,
    DataList,
    Button,
    Row,
    Group,
    Summary,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Panel => "panel",
            Role::Title => "title",
            Role::Subtitle => "subtitle",
            Role::Field => "field",
            Role::Label => "label",
            Role::LabelText => "label-text",
            Role::HintIcon => "hint-icon",
            Role::Hint => "hint",
            Role::HintText => "hint-text",
            Role::Controller => "controller",
            Role::Input => "input",
            Role::TextArea => "textarea",
            Role::Select => "select",
            Role::Option => "option",
            Role::DataList => "datalist",
            Role::Button => "button",
            Role::Row => "row",
            Role::Group => "group",
            Role::Summary => "summary",
        }
    }

    /// Roles that accept end-user edits and honor the readonly flag.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Role::Input | Role::TextArea | Role::Select | Role::Button)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The node's value changed.
    Input,
    /// Click or keyboard activation.
    Activate,
}

/// An event travelling from its target up through the target's ancestors.
pub struct Event {
    kind: EventKind,
    target: Node,
    stopped: Cell<bool>,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn target(&self) -> &Node {
        &self.target
    }

    /// Prevents ancestors from seeing this event.
    pub fn stop_propagation(&self) {
        self.stopped.set(true);
    }
}

pub type Listener = Rc<dyn Fn(&Event)>;

struct NodeData {
    role: Role,
    id: Option<String>,
    attributes: IndexMap<String, String>,
    text: String,
    value: String,
    readonly: bool,
    locked: bool,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<Node>,
    listeners: Vec<(EventKind, Listener)>,
}

/// Shared handle to a node in the tree.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

/// Non-owning handle, upgraded when a listener fires.
#[derive(Clone)]
pub struct WeakNode(Weak<RefCell<NodeData>>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

impl Node {
    pub fn new(role: Role) -> Self {
        Node(Rc::new(RefCell::new(NodeData {
            role,
            id: None,
            attributes: IndexMap::new(),
            text: String::new(),
            value: String::new(),
            readonly: false,
            locked: false,
            parent: Weak::new(),
            children: Vec::new(),
            listeners: Vec::new(),
        })))
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.0.borrow_mut().id = Some(id.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_attribute(self, name: &str, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn role(&self) -> Role {
        self.0.borrow().role
    }

    pub fn id(&self) -> Option<String> {
        self.0.borrow().id.clone()
    }

    pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
        self.0.borrow_mut().attributes.insert(name.to_string(), value.into());
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn remove_attribute(&self, name: &str) {
        self.0.borrow_mut().attributes.shift_remove(name);
    }

    pub fn attributes(&self) -> Vec<(String, String)> {
        self.0
            .borrow()
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.0.borrow_mut().text = text.into();
    }

    pub fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    /// Sets the value without notifying listeners.
    pub fn set_value(&self, value: impl Into<String>) {
        self.0.borrow_mut().value = value.into();
    }

    /// True when the node is declared readonly or sits under an active lock.
    pub fn is_readonly(&self) -> bool {
        let data = self.0.borrow();
        data.readonly || data.locked
    }

    /// Sets the node's own declared readonly flag.
    pub fn set_readonly(&self, readonly: bool) {
        self.0.borrow_mut().readonly = readonly;
    }

    /// Sets the declared readonly flag on this node and every interactive descendant.
    pub fn set_readonly_tree(&self, readonly: bool) {
        self.walk(&mut |node: &Node| {
            if node.role().is_interactive() {
                node.set_readonly(readonly);
            }
        });
    }

    /// Temporarily locks or unlocks every interactive node below this one.
    /// The lock sits on top of the declared flag, so unlocking leaves
    /// declared-readonly nodes readonly.
    pub fn set_locked_tree(&self, locked: bool) {
        self.walk(&mut |node: &Node| {
            if node.role().is_interactive() {
                node.0.borrow_mut().locked = locked;
            }
        });
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.borrow().children.len()
    }

    /// Appends `child`, detaching it from any previous parent first.
    pub fn append_child(&self, child: &Node) {
        child.remove();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
    }

    /// Detaches this node from its parent. Returns false when it had none.
    pub fn remove(&self) -> bool {
        let Some(parent) = self.parent() else {
            return false;
        };
        parent.0.borrow_mut().children.retain(|candidate| !candidate.ptr_eq(self));
        self.0.borrow_mut().parent = Weak::new();
        true
    }

    /// Returns true when `self` is `other` or one of its ancestors.
    pub fn contains(&self, other: &Node) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Visits this node and its descendants in document order.
    pub fn walk(&self, visit: &mut dyn FnMut(&Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// First descendant (excluding `self`) matching `predicate`, in document order.
    pub fn find_first(&self, predicate: &dyn Fn(&Node) -> bool) -> Option<Node> {
        for child in self.children() {
            if predicate(&child) {
                return Some(child);
            }
            if let Some(found) = child.find_first(predicate) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants (excluding `self`) matching `predicate`, in document order.
    pub fn find_all(&self, predicate: &dyn Fn(&Node) -> bool) -> Vec<Node> {
        let mut found = Vec::new();
        for child in self.children() {
            child.walk(&mut |node: &Node| {
                if predicate(node) {
                    found.push(node.clone());
                }
            });
        }
        found
    }

    pub fn find_by_role(&self, role: Role) -> Option<Node> {
        self.find_first(&|node: &Node| node.role() == role)
    }

    pub fn find_all_by_role(&self, role: Role) -> Vec<Node> {
        self.find_all(&|node: &Node| node.role() == role)
    }

    pub fn find_by_id(&self, id: &str) -> Option<Node> {
        self.find_first(&|node: &Node| node.0.borrow().id.as_deref() == Some(id))
    }

    pub fn add_listener(&self, kind: EventKind, listener: impl Fn(&Event) + 'static) {
        self.0.borrow_mut().listeners.push((kind, Rc::new(listener)));
    }

    /// Delivers an event to this node, then to each ancestor until a listener
    /// stops propagation. The ancestor chain is fixed before any listener runs,
    /// so listeners may freely restructure the tree.
    pub fn dispatch(&self, kind: EventKind) {
        let mut chain = vec![self.clone()];
        while let Some(parent) = chain.last().and_then(Node::parent) {
            chain.push(parent);
        }

        let event = Event {
            kind,
            target: self.clone(),
            stopped: Cell::new(false),
        };
        for node in chain {
            let listeners: Vec<Listener> = node
                .0
                .borrow()
                .listeners
                .iter()
                .filter(|(listener_kind, _)| *listener_kind == kind)
                .map(|(_, listener)| listener.clone())
                .collect();
            for listener in listeners {
                listener(&event);
            }
            if event.stopped.get() {
                break;
            }
        }
    }

    /// An end-user edit. Rejected (returns false) when the node is readonly.
    pub fn user_input(&self, value: impl Into<String>) -> bool {
        if self.is_readonly() {
            return false;
        }
        self.set_value(value);
        self.dispatch(EventKind::Input);
        true
    }

    /// An end-user click or key activation. Readonly interactive nodes ignore it.
    pub fn activate(&self) -> bool {
        if self.role().is_interactive() && self.is_readonly() {
            return false;
        }
        self.dispatch(EventKind::Activate);
        true
    }

    /// A programmatic value change; propagates even when readonly.
    pub fn set_value_and_notify(&self, value: impl Into<String>) {
        self.set_value(value);
        self.dispatch(EventKind::Input);
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Node")
            .field("role", &data.role)
            .field("id", &data.id)
            .field("children", &data.children.len())
            .finish()
    }
}

impl fmt::Debug for WeakNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakNode").field(&self.upgrade()).finish()
    }
}
