//! Virtual document model.
//!
//! The lightbox never touches a browser directly: every read and write goes
//! through [`Document`], an arena of nodes addressed by [`NodeId`]. The write
//! surface is deliberately small (create, append, remove, attributes,
//! classes, inline style, raw markup, focus, listeners) so a controller can be
//! driven and inspected in tests exactly as it would drive a real page.
//!
//! ## Nodes
//!
//! A node is either an element (tag, attributes, class list, inline style) or
//! a raw markup fragment. Raw fragments model `innerHTML` assignments such as
//! `&lsaquo;` button labels: they are stored verbatim and emitted unescaped by
//! [`crate::render`].
//!
//! Nodes are never freed. Removing a node detaches it from its parent; its id
//! stays valid and it can be re-attached.
//!
//! ## Listeners and propagation
//!
//! Listeners are registered per owner (one owner per lightbox instance) and
//! carry a [`Handler`] tag instead of a closure. [`Document::route`] computes
//! the ordered delivery list for an event the way the DOM does: capturing
//! listeners from the document down to the target's parent, every listener
//! on the target, then bubbling listeners back up (for events that bubble).

use crate::events::{EventKind, Handler};
use crate::selector::{Selector, SelectorError};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[cfg(test)]
    pub(crate) const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Identifies the party that registered a set of listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(u32);

impl OwnerId {
    pub const fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTarget {
    Document,
    Node(NodeId),
}

#[derive(Debug, Clone)]
struct Listener {
    id: ListenerId,
    owner: OwnerId,
    target: ListenerTarget,
    kind: EventKind,
    capture: bool,
    handler: Handler,
}

/// One listener invocation produced by [`Document::route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub listener: ListenerId,
    pub owner: OwnerId,
    pub handler: Handler,
    pub current_target: ListenerTarget,
}

/// Element payload.
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn style(&self) -> &BTreeMap<String, String> {
        &self.style
    }

    /// Attributes as they would be serialized, with `class` and `style`
    /// folded in, sorted by name.
    pub fn attributes(&self) -> Vec<(String, String)> {
        let mut attrs: Vec<(String, String)> = self
            .attributes
            .iter()
            .filter(|(k, _)| k.as_str() != "class")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !self.classes.is_empty() {
            attrs.push(("class".to_string(), self.classes.join(" ")));
        }
        if let Some(style) = self.style_text() {
            attrs.push(("style".to_string(), style));
        }
        attrs.sort_by(|a, b| a.0.cmp(&b.0));
        attrs
    }

    fn style_text(&self) -> Option<String> {
        if self.style.is_empty() {
            return None;
        }
        Some(
            self.style
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum Content {
    Element(Element),
    Markup(String),
}

#[derive(Debug, Clone)]
struct Node {
    content: Content,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// CSS properties every document understands.
const BASE_STYLE_PROPERTIES: &[&str] = &["cursor", "display", "opacity", "transform"];

/// An in-memory HTML document: `<html>` with `<head>` and `<body>`.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    active: Option<NodeId>,
    touch: bool,
    style_properties: BTreeSet<String>,
    listeners: Vec<Listener>,
    next_listener: u64,
    next_owner: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            active: None,
            touch: false,
            style_properties: BASE_STYLE_PROPERTIES.iter().map(|p| p.to_string()).collect(),
            listeners: Vec::new(),
            next_listener: 0,
            next_owner: 0,
        };
        doc.root = doc.create_element("html");
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.append_child(doc.root, doc.head);
        doc.append_child(doc.root, doc.body);
        doc
    }

    /// Mark the document as running on a touch-capable device.
    pub fn with_touch(mut self, touch: bool) -> Self {
        self.touch = touch;
        self
    }

    /// Replace the set of style properties the document claims to support.
    ///
    /// Used to emulate engines that only understand vendor-prefixed names.
    pub fn with_style_support<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.style_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_touch(&self) -> bool {
        self.touch
    }

    pub fn supports_style(&self, property: &str) -> bool {
        self.style_properties.contains(property)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Tree construction
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Content::Element(Element {
            tag: tag.to_ascii_lowercase(),
            ..Element::default()
        }))
    }

    pub fn create_markup(&mut self, markup: &str) -> NodeId {
        self.push(Content::Markup(markup.to_string()))
    }

    fn push(&mut self, content: Content) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            content,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Detach `node` from its parent. Returns `false` if it had none.
    pub fn detach(&mut self, node: NodeId) -> bool {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return false;
        };
        self.nodes[parent.0].children.retain(|&c| c != node);
        if self.active.is_some_and(|a| self.contains(node, a)) {
            self.active = None;
        }
        true
    }

    /// Replace the children of `node` with a single raw markup fragment.
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        if !markup.is_empty() {
            let fragment = self.create_markup(markup);
            self.append_child(node, fragment);
        }
    }

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    pub fn content(&self, node: NodeId) -> &Content {
        &self.nodes[node.0].content
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].content {
            Content::Element(el) => Some(el),
            Content::Markup(_) => None,
        }
    }

    fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].content {
            Content::Element(el) => Some(el),
            Content::Markup(_) => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(Element::tag)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes[current.0].parent;
        }
        false
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    /// Descendants of `node` in document (pre-)order, excluding `node`.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// First descendant element with the given tag.
    pub fn first_by_tag(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        self.descendants(node)
            .into_iter()
            .find(|&n| self.tag(n).is_some_and(|t| t.eq_ignore_ascii_case(tag)))
    }

    /// All connected elements matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    /// Parse `selector` and run [`Document::query_selector_all`].
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        Ok(self.query_selector_all(&Selector::parse(selector)?))
    }

    /// Elements on the path from the root down to `node`, inclusive.
    fn path_to(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.nodes[current.0].parent;
        }
        path.reverse();
        path
    }

    // ------------------------------------------------------------------
    // Attributes, classes, style
    // ------------------------------------------------------------------

    /// Read an attribute. `class` reflects the class list.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attributes.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        if name == "class" {
            el.classes = value.split_whitespace().map(str::to_string).collect();
            Self::sync_class_attribute(el);
            return;
        }
        el.attributes.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        if name == "class" {
            el.classes.clear();
        }
        el.attributes.remove(name);
    }

    /// Set or clear a boolean attribute such as `disabled`.
    pub fn set_flag(&mut self, node: NodeId, name: &str, on: bool) {
        if on {
            self.set_attribute(node, name, "");
        } else {
            self.remove_attribute(node, name);
        }
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
                Self::sync_class_attribute(el);
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
            Self::sync_class_attribute(el);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    // The class list is the source of truth; `attributes["class"]` mirrors it
    // for reads and is skipped by `Element::attributes`.
    fn sync_class_attribute(el: &mut Element) {
        if el.classes.is_empty() {
            el.attributes.remove("class");
        } else {
            el.attributes.insert("class".to_string(), el.classes.join(" "));
        }
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.style.insert(property.to_string(), value.to_string());
        }
    }

    pub fn remove_style(&mut self, node: NodeId, property: &str) {
        if let Some(el) = self.element_mut(node) {
            el.style.remove(property);
        }
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.element(node)?.style.get(property).map(String::as_str)
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// The focused element, or `<body>` when nothing is.
    pub fn active_element(&self) -> NodeId {
        self.active.unwrap_or(self.body)
    }

    pub fn focus(&mut self, node: NodeId) {
        if self.element(node).is_some() {
            self.active = Some(node);
        }
    }

    pub fn blur(&mut self) {
        self.active = None;
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Allocate a fresh listener owner.
    pub fn new_owner(&mut self) -> OwnerId {
        self.next_owner += 1;
        OwnerId(self.next_owner)
    }

    pub fn add_listener(
        &mut self,
        owner: OwnerId,
        target: ListenerTarget,
        kind: EventKind,
        capture: bool,
        handler: Handler,
    ) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.push(Listener {
            id,
            owner,
            target,
            kind,
            capture,
            handler,
        });
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    /// Number of listeners registered by `owner`.
    pub fn listener_count(&self, owner: OwnerId) -> usize {
        self.listeners.iter().filter(|l| l.owner == owner).count()
    }

    /// Number of listeners registered by `owner` for `kind` on `target`.
    pub fn listeners_on(&self, owner: OwnerId, target: ListenerTarget, kind: EventKind) -> usize {
        self.listeners
            .iter()
            .filter(|l| l.owner == owner && l.target == target && l.kind == kind)
            .count()
    }

    /// Ordered listener invocations for an event of `kind` aimed at `target`.
    pub fn route(&self, kind: EventKind, target: NodeId) -> Vec<Delivery> {
        let path = self.path_to(target);
        let connected = path.first() == Some(&self.root);
        let Some((&target_node, ancestors)) = path.split_last() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        let mut collect = |at: ListenerTarget, phase: Phase| {
            for l in &self.listeners {
                let wanted = match phase {
                    Phase::Capture => l.capture,
                    Phase::Target => true,
                    Phase::Bubble => !l.capture,
                };
                if l.target == at && l.kind == kind && wanted {
                    out.push(Delivery {
                        listener: l.id,
                        owner: l.owner,
                        handler: l.handler,
                        current_target: at,
                    });
                }
            }
        };

        if connected {
            collect(ListenerTarget::Document, Phase::Capture);
        }
        for &node in ancestors {
            collect(ListenerTarget::Node(node), Phase::Capture);
        }
        collect(ListenerTarget::Node(target_node), Phase::Target);
        if kind.bubbles() {
            for &node in ancestors.iter().rev() {
                collect(ListenerTarget::Node(node), Phase::Bubble);
            }
            if connected {
                collect(ListenerTarget::Document, Phase::Bubble);
            }
        }
        out
    }
}

#[derive(Clone, Copy)]
enum Phase {
    Capture,
    Target,
    Bubble,
}
