//! Layout-query capability injected into the controller.
//!
//! The browser implementation lives in `sticky-web`; `sticky-harness`
//! provides an in-memory document for deterministic tests.

use crate::geometry::{OffsetBox, Viewport};
use crate::readiness::ReadyState;

/// The only style properties the controller ever writes or clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Position,
    Width,
    Top,
    Left,
}

impl StyleProperty {
    pub const ALL: [Self; 4] = [Self::Position, Self::Width, Self::Top, Self::Left];

    /// CSS property name.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Width => "width",
            Self::Top => "top",
            Self::Left => "left",
        }
    }
}

/// Everything the controller needs to know about (and do to) a document.
///
/// Implementations must not fail: queries that cannot be answered return
/// neutral values (empty lists, zero boxes, `None`), and style writes that the
/// platform rejects are dropped.
pub trait LayoutHost {
    /// Handle to an element. Equality must be identity.
    type Node: Clone + PartialEq;

    /// All elements matching `selector`, in document order. An invalid
    /// selector matches nothing.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    fn ready_state(&self) -> ReadyState;

    fn viewport(&self) -> Viewport;

    /// Current vertical scroll offset of the document.
    fn scroll_offset(&self) -> f64;

    /// The document's root element.
    fn document_root(&self) -> Self::Node;

    /// Parent element, `None` at the root or for detached subtrees.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn offset_parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn offset_box(&self, node: &Self::Node) -> OffsetBox;

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Whether the node is an image whose box depends on its resource loading.
    fn is_image(&self, node: &Self::Node) -> bool;

    /// Whether the node is still part of the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    fn set_style(&self, node: &Self::Node, property: StyleProperty, value: &str);

    fn clear_style(&self, node: &Self::Node, property: StyleProperty);
}
