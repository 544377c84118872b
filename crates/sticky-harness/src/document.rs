//! In-memory document implementing [`LayoutHost`].
//!
//! Layout is not computed: each element carries the offset box a browser would
//! report for it in normal flow. Two browser behaviors are modelled because
//! the controller depends on them:
//!
//! - an element with `position: fixed` reports its viewport-relative `top` and
//!   `left` as offsets and has no offset parent, so measuring it while pinned
//!   gives the wrong answer;
//! - detached elements have no parent, are not connected, and report a zero
//!   offset box.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use sticky_core::{LayoutHost, OffsetBox, ReadyState, StyleProperty, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Description of an element to append.
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    offset: OffsetBox,
}

impl FakeElement {
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn div() -> Self {
        Self::new("div")
    }

    #[must_use]
    pub fn img() -> Self {
        Self::new("img")
    }

    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Offsets relative to the parent element, and own size.
    #[must_use]
    pub fn offset(mut self, top: f64, left: f64, width: f64, height: f64) -> Self {
        self.offset = OffsetBox {
            top,
            left,
            width,
            height,
        };
        self
    }

    fn matches_simple(&self, selector: &str) -> bool {
        if let Some(class) = selector.strip_prefix('.') {
            return self.classes.iter().any(|c| c == class);
        }
        if let Some(id) = selector.strip_prefix('#') {
            return self.id.as_deref() == Some(id);
        }
        if let Some(attr) = selector
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            return self.attributes.contains_key(attr);
        }
        !selector.is_empty() && self.tag.eq_ignore_ascii_case(selector)
    }
}

#[derive(Debug)]
struct NodeData {
    element: FakeElement,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    styles: BTreeMap<&'static str, String>,
    connected: bool,
}

#[derive(Debug)]
struct DocState {
    nodes: Vec<NodeData>,
    viewport: Viewport,
    scroll_offset: f64,
    ready_state: ReadyState,
    style_writes: usize,
}

/// Shared handle to an in-memory document. Clones refer to the same document,
/// so a test can keep one while the controller owns another.
#[derive(Debug, Clone)]
pub struct FakeDocument {
    inner: Rc<RefCell<DocState>>,
}

impl FakeDocument {
    /// A complete document whose root `html` element spans `height` pixels.
    #[must_use]
    pub fn new(viewport: Viewport, height: f64) -> Self {
        let root = NodeData {
            element: FakeElement::new("html").offset(0.0, 0.0, viewport.width, height),
            parent: None,
            children: Vec::new(),
            styles: BTreeMap::new(),
            connected: true,
        };
        Self {
            inner: Rc::new(RefCell::new(DocState {
                nodes: vec![root],
                viewport,
                scroll_offset: 0.0,
                ready_state: ReadyState::Complete,
                style_writes: 0,
            })),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn append(&self, parent: NodeId, element: FakeElement) -> NodeId {
        let mut doc = self.inner.borrow_mut();
        let id = NodeId(doc.nodes.len());
        let connected = doc.nodes[parent.0].connected;
        doc.nodes.push(NodeData {
            element,
            parent: Some(parent),
            children: Vec::new(),
            styles: BTreeMap::new(),
            connected,
        });
        doc.nodes[parent.0].children.push(id);
        id
    }

    /// Remove `node` and its subtree from the document.
    pub fn detach(&self, node: NodeId) {
        let mut doc = self.inner.borrow_mut();
        if let Some(parent) = doc.nodes[node.0].parent.take() {
            doc.nodes[parent.0].children.retain(|&c| c != node);
        }
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            doc.nodes[current.0].connected = false;
            stack.extend(doc.nodes[current.0].children.iter().copied());
        }
    }

    pub fn set_scroll(&self, offset: f64) {
        self.inner.borrow_mut().scroll_offset = offset;
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.borrow_mut().viewport = viewport;
    }

    pub fn set_ready_state(&self, state: ReadyState) {
        self.inner.borrow_mut().ready_state = state;
    }

    /// Change an element's normal-flow offset box, as a reflow would.
    pub fn set_offset(&self, node: NodeId, top: f64, left: f64, width: f64, height: f64) {
        self.inner.borrow_mut().nodes[node.0].element.offset = OffsetBox {
            top,
            left,
            width,
            height,
        };
    }

    /// Inline style value currently set on `node`.
    #[must_use]
    pub fn style(&self, node: NodeId, property: StyleProperty) -> Option<String> {
        self.inner.borrow().nodes[node.0]
            .styles
            .get(property.css_name())
            .cloned()
    }

    /// All inline styles on `node`, keyed by CSS property name.
    #[must_use]
    pub fn styles(&self, node: NodeId) -> BTreeMap<&'static str, String> {
        self.inner.borrow().nodes[node.0].styles.clone()
    }

    #[must_use]
    pub fn is_fixed(&self, node: NodeId) -> bool {
        self.style(node, StyleProperty::Position).as_deref() == Some("fixed")
    }

    /// Pixel value of the inline `top`, if set.
    #[must_use]
    pub fn top_px(&self, node: NodeId) -> Option<f64> {
        self.style(node, StyleProperty::Top)
            .as_deref()
            .and_then(parse_px)
    }

    /// Total number of `set_style` calls.
    #[must_use]
    pub fn style_writes(&self) -> usize {
        self.inner.borrow().style_writes
    }
}

fn parse_px(value: &str) -> Option<f64> {
    value.strip_suffix("px")?.parse().ok()
}

impl LayoutHost for FakeDocument {
    type Node = NodeId;

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        let parts: Vec<&str> = selector.split(',').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Vec::new();
        }
        let doc = self.inner.borrow();
        doc.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.connected)
            .filter(|(_, n)| parts.iter().any(|p| n.element.matches_simple(p)))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    fn ready_state(&self) -> ReadyState {
        self.inner.borrow().ready_state
    }

    fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    fn scroll_offset(&self) -> f64 {
        self.inner.borrow().scroll_offset
    }

    fn document_root(&self) -> NodeId {
        self.root()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.inner.borrow().nodes[node.0].parent
    }

    fn offset_parent(&self, node: &NodeId) -> Option<NodeId> {
        if self.is_fixed(*node) {
            return None;
        }
        self.parent(node)
    }

    fn offset_box(&self, node: &NodeId) -> OffsetBox {
        let doc = self.inner.borrow();
        let data = &doc.nodes[node.0];
        if !data.connected {
            return OffsetBox::default();
        }
        let natural = data.element.offset;
        if data.styles.get("position").map(String::as_str) != Some("fixed") {
            return natural;
        }
        let read = |name: &str| data.styles.get(name).and_then(|v| parse_px(v));
        OffsetBox {
            top: read("top").unwrap_or(0.0),
            left: read("left").unwrap_or(natural.left),
            width: read("width").unwrap_or(natural.width),
            height: natural.height,
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.inner.borrow().nodes[node.0]
            .element
            .attributes
            .get(name)
            .cloned()
    }

    fn is_image(&self, node: &NodeId) -> bool {
        self.inner.borrow().nodes[node.0].element.tag == "img"
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.inner.borrow().nodes[node.0].connected
    }

    fn set_style(&self, node: &NodeId, property: StyleProperty, value: &str) {
        let mut doc = self.inner.borrow_mut();
        doc.style_writes += 1;
        doc.nodes[node.0]
            .styles
            .insert(property.css_name(), value.to_string());
    }

    fn clear_style(&self, node: &NodeId, property: StyleProperty) {
        self.inner.borrow_mut().nodes[node.0]
            .styles
            .remove(property.css_name());
    }
}
