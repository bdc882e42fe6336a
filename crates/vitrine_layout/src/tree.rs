//! Document tree management

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use vitrine_core::geometry::{Point, Rect, Size};

use crate::selector::Selector;

new_key_type! {
    pub struct NodeId;
}

/// Inline style overrides written by widgets
///
/// Only the properties the widgets actually drive are modelled; everything
/// else about a node's box comes from its host-placed frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    /// Fixed height in pixels, overriding the natural height
    pub height: Option<f32>,
    pub overflow_hidden: bool,
    /// Horizontal offset as a percentage of the parent's width
    pub left_percent: Option<f32>,
    /// Width as a percentage of the parent's width
    pub width_percent: Option<f32>,
    /// Removed from rendering (`display: none`)
    pub hidden: bool,
    /// Invisible but still occupying space (`visibility: hidden`)
    pub visibility_hidden: bool,
    pub position_relative: bool,
    /// Taken out of the parent's flow; does not contribute to its height
    pub position_absolute: bool,
}

impl Style {
    /// Check if no override is set
    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }
}

/// A single element in the document
#[derive(Clone, Debug)]
pub struct Node {
    tag: String,
    attrs: IndexMap<String, String>,
    classes: SmallVec<[String; 4]>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Box placed by the host; origin is relative to the parent
    frame: Rect,
    style: Style,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: IndexMap::new(),
            classes: SmallVec::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            frame: Rect::ZERO,
            style: Style::default(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Attributes in insertion order (`class` is kept separately)
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// ============================================================================
// Element builder
// ============================================================================

/// Declarative description of a subtree, inserted with
/// [`Document::append_element`]
#[derive(Clone, Debug, Default)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    text: String,
    frame: Rect,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Position relative to the parent
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.frame.origin = Point::new(x, y);
        self
    }

    pub fn size(mut self, width: f32, height: f32) -> Self {
        self.frame.size = Size::new(width, height);
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }
}

// ============================================================================
// Document
// ============================================================================

/// The element tree plus viewport, focus and pointer capture state
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
    ids: FxHashMap<String, NodeId>,
    captures: FxHashMap<u32, NodeId>,
    focused: Option<NodeId>,
    viewport: Size,
    scroll_y: f32,
}

impl Document {
    /// Create a document whose root (`body`) spans the viewport width
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut body = Node::new("body");
        body.frame = Rect::new(0.0, 0.0, viewport_width, 0.0);
        let root = nodes.insert(body);

        Self {
            nodes,
            root,
            ids: FxHashMap::default(),
            captures: FxHashMap::default(),
            focused: None,
            viewport: Size::new(viewport_width, viewport_height),
            scroll_y: 0.0,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn exists(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width, height);
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn set_scroll_y(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y.max(0.0);
    }

    /// The visible part of the page, in page coordinates
    pub fn viewport_rect(&self) -> Rect {
        Rect::new(
            0.0,
            self.scroll_y,
            self.viewport.width,
            self.viewport.height,
        )
    }

    // ========================================================================
    // Structure
    // ========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(Node::new(tag))
    }

    /// Insert a described subtree as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        let top = self.insert_described(parent, &element);
        let mut stack: Vec<(NodeId, &Element)> =
            element.children.iter().rev().map(|c| (top, c)).collect();

        while let Some((parent, desc)) = stack.pop() {
            let id = self.insert_described(parent, desc);
            stack.extend(desc.children.iter().rev().map(|c| (id, c)));
        }
        top
    }

    fn insert_described(&mut self, parent: NodeId, desc: &Element) -> NodeId {
        let id = self.create_element(&desc.tag);
        for (name, value) in &desc.attrs {
            self.set_attr(id, name, value);
        }
        for class in &desc.classes {
            self.add_class(id, class);
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.text.clone_from(&desc.text);
            node.frame = desc.frame;
        }
        self.append_child(parent, id);
        id
    }

    /// Move `child` to the end of `parent`'s children
    ///
    /// Returns false (and changes nothing) if either node is missing or the
    /// move would create a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.exists(parent) || !self.exists(child) || self.contains(child, parent) {
            return false;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(child);
        }
        true
    }

    /// Unlink a node from its parent, keeping its subtree alive
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|&c| c != id);
        }
    }

    /// Remove a node and its whole subtree
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || !self.exists(id) {
            return;
        }
        self.detach(id);

        let mut doomed = self.descendants(id);
        doomed.push(id);
        for node in doomed {
            if let Some(removed) = self.nodes.remove(node) {
                if let Some(key) = removed.attrs.get("id") {
                    if self.ids.get(key) == Some(&node) {
                        self.ids.remove(key);
                    }
                }
            }
            self.captures.retain(|_, target| *target != node);
            if self.focused == Some(node) {
                self.focused = None;
            }
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// All descendants in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Check if `node` is `ancestor` or lies inside its subtree
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// The node followed by its ancestors, innermost first
    pub fn path(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut path = SmallVec::new();
        if self.exists(id) {
            path.push(id);
            path.extend(self.ancestors(id));
        }
        path
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn matches(&self, id: NodeId, selector: &Selector) -> bool {
        selector.matches(self, id)
    }

    /// Nearest inclusive ancestor matching `selector`
    pub fn closest(&self, id: NodeId, selector: &Selector) -> Option<NodeId> {
        if !self.exists(id) {
            return None;
        }
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| selector.matches(self, n))
    }

    /// First descendant of `scope` matching `selector`
    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| selector.matches(self, n))
    }

    /// Every descendant of `scope` matching `selector`, in document order
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| selector.matches(self, n))
            .collect()
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    // ========================================================================
    // Attributes, classes, text
    // ========================================================================

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).map(Node::tag)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id).and_then(|n| n.attr(name))
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| n.has_attr(name))
    }

    /// Set an attribute; `class` replaces the class list
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if name == "class" {
            if let Some(node) = self.nodes.get_mut(id) {
                node.classes = value.split_whitespace().map(str::to_owned).collect();
            }
            return;
        }
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let previous = node.attrs.insert(name.to_owned(), value.to_owned());
        if name == "id" {
            if let Some(old) = previous {
                if self.ids.get(&old) == Some(&id) {
                    self.ids.remove(&old);
                }
            }
            self.ids.insert(value.to_owned(), id);
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if let Some(old) = node.attrs.shift_remove(name) {
            if name == "id" && self.ids.get(&old) == Some(&id) {
                self.ids.remove(&old);
            }
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| n.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            if !node.has_class(class) {
                node.classes.push(class.to_owned());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    /// Add or remove `class` depending on `on`
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    pub fn text(&self, id: NodeId) -> &str {
        self.nodes.get(id).map(Node::text).unwrap_or("")
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            text.clone_into(&mut node.text);
        }
    }

    /// Form control value (the `value` attribute, empty if unset)
    pub fn value(&self, id: NodeId) -> &str {
        self.attr(id, "value").unwrap_or("")
    }

    pub fn set_value(&mut self, id: NodeId, value: &str) {
        self.set_attr(id, "value", value);
    }

    // ========================================================================
    // Boxes and style
    // ========================================================================

    pub fn frame(&self, id: NodeId) -> Rect {
        self.nodes.get(id).map(Node::frame).unwrap_or(Rect::ZERO)
    }

    pub fn set_frame(&mut self, id: NodeId, frame: Rect) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.frame = frame;
        }
    }

    pub fn style(&self, id: NodeId) -> Option<&Style> {
        self.nodes.get(id).map(Node::style)
    }

    pub fn style_mut(&mut self, id: NodeId) -> Option<&mut Style> {
        self.nodes.get_mut(id).map(|n| &mut n.style)
    }

    // ========================================================================
    // Focus and pointer capture
    // ========================================================================

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Move focus, returning the previously focused node
    pub fn set_focus(&mut self, id: Option<NodeId>) -> Option<NodeId> {
        let id = id.filter(|&n| self.exists(n));
        std::mem::replace(&mut self.focused, id)
    }

    /// Route all further events of `pointer_id` to `node`
    pub fn capture_pointer(&mut self, pointer_id: u32, node: NodeId) {
        if self.exists(node) {
            tracing::trace!(pointer_id, ?node, "pointer captured");
            self.captures.insert(pointer_id, node);
        }
    }

    pub fn release_pointer(&mut self, pointer_id: u32) -> Option<NodeId> {
        self.captures.remove(&pointer_id)
    }

    pub fn pointer_capture(&self, pointer_id: u32) -> Option<NodeId> {
        self.captures.get(&pointer_id).copied()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("viewport", &self.viewport)
            .field("scroll_y", &self.scroll_y)
            .field("focused", &self.focused)
            .finish()
    }
}

/// Iterator over a node's ancestors, innermost first
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}
