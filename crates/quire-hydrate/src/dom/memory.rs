//! In-memory document with synchronous event dispatch.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::{Dom, DomEvent, Listener, Selector};

/// Handle to an element in a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

struct Element {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
    listeners: Vec<(DomEvent, Listener<MemoryDom>)>,
    paused: bool,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            children: Vec::new(),
            listeners: Vec::new(),
            paused: true,
        }
    }

    fn matches(&self, selector: Selector<'_>) -> bool {
        match selector {
            Selector::Class(class) => self.classes.iter().any(|c| c == class),
            Selector::Tag(tag) => self.tag.eq_ignore_ascii_case(tag),
        }
    }
}

/// An element tree rooted at `body`.
///
/// Media elements start paused. [`MemoryDom::play`] and [`MemoryDom::pause`]
/// stand in for native media controls: they flip the paused flag and fire
/// `play`/`pause` only on an actual transition, as a browser does.
pub struct MemoryDom {
    elements: Vec<Element>,
}

impl MemoryDom {
    /// An empty document.
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
        }
    }

    /// The `body` element.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create an element with `classes` and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        let node = self.create_element(tag);
        for class in classes {
            self.add_class(node, class);
        }
        self.append_child(parent, node);
        node
    }

    /// Fire `event` on `node`, running its listeners in registration order.
    pub fn dispatch(&mut self, node: NodeId, event: DomEvent) {
        // Listeners get `&mut self`, so run them from a snapshot
        let listeners: Vec<Listener<Self>> = self.elements[node.0]
            .listeners
            .iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, l)| Rc::clone(l))
            .collect();

        for listener in listeners {
            (*listener)(self);
        }
    }

    /// Start playback of a media element.
    pub fn play(&mut self, node: NodeId) {
        if self.elements[node.0].paused {
            self.elements[node.0].paused = false;
            self.dispatch(node, DomEvent::Play);
        }
    }

    /// Pause a media element.
    pub fn pause(&mut self, node: NodeId) {
        if !self.elements[node.0].paused {
            self.elements[node.0].paused = true;
            self.dispatch(node, DomEvent::Pause);
        }
    }

    /// Click an element.
    pub fn click(&mut self, node: NodeId) {
        self.dispatch(node, DomEvent::Click);
    }

    /// Number of listeners for `event` on `node`.
    pub fn listener_count(&self, node: NodeId, event: DomEvent) -> usize {
        self.elements[node.0]
            .listeners
            .iter()
            .filter(|(e, _)| *e == event)
            .count()
    }

    /// Direct children of `node` carrying `class`.
    pub fn children_with_class(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        self.elements[node.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.elements[child.0].matches(Selector::Class(class)))
            .collect()
    }

    /// Text content set on `node`.
    pub fn text(&self, node: NodeId) -> &str {
        &self.elements[node.0].text
    }

    fn find_descendant(&self, root: NodeId, selector: Selector<'_>) -> Option<NodeId> {
        for &child in &self.elements[root.0].children {
            if self.elements[child.0].matches(selector) {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, selector) {
                return Some(found);
            }
        }
        None
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDom")
            .field("elements", &self.elements.len())
            .finish()
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query(&self, selector: Selector<'_>) -> Option<NodeId> {
        self.find_descendant(self.root(), selector)
    }

    fn query_within(&self, root: NodeId, selector: Selector<'_>) -> Option<NodeId> {
        self.find_descendant(root, selector)
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.elements.push(Element::new(tag));
        NodeId(self.elements.len() - 1)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.elements[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.elements[node.0].text = text.to_string();
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.elements[parent.0].children.push(child);
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.elements[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.elements[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn add_listener(&mut self, node: NodeId, event: DomEvent, listener: Listener<Self>) {
        self.elements[node.0].listeners.push((event, listener));
    }

    fn media_paused(&self, node: NodeId) -> bool {
        self.elements[node.0].paused
    }

    fn play_media(&mut self, node: NodeId) {
        self.play(node);
    }
}
