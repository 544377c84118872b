//! Document-space geometry.
//!
//! All values are CSS pixels. Element rectangles are measured relative to the
//! document origin by summing offsets along the offset-parent chain, the same
//! frame of reference the scroll offset lives in.

use serde::Serialize;

use crate::host::LayoutHost;

/// Upper bound on offset-parent hops. Real documents are far shallower; this
/// only guards against a host that reports a cyclic chain.
const MAX_OFFSET_CHAIN: usize = 4096;

/// A box in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Document-space y coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Browser viewport size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Combine the document client size with the window inner size, taking
    /// the larger of each dimension. Missing inner sizes count as zero.
    #[must_use]
    pub fn from_client_and_inner(
        client_width: f64,
        client_height: f64,
        inner_width: Option<f64>,
        inner_height: Option<f64>,
    ) -> Self {
        Self {
            width: client_width.max(inner_width.unwrap_or(0.0)),
            height: client_height.max(inner_height.unwrap_or(0.0)),
        }
    }
}

/// One node's offset metrics relative to its offset parent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffsetBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// Measure `node` in document coordinates.
///
/// Position is the sum of `offsetTop`/`offsetLeft` from `node` up through
/// every offset parent; size is the node's own offset size.
pub fn document_rect<H: LayoutHost>(host: &H, node: &H::Node) -> Rect {
    let own = host.offset_box(node);
    let mut top = own.top;
    let mut left = own.left;

    let mut cursor = host.offset_parent(node);
    let mut hops = 0;
    while let Some(parent) = cursor {
        if hops == MAX_OFFSET_CHAIN {
            tracing::warn!(hops, "offset parent chain did not terminate");
            break;
        }
        let offsets = host.offset_box(&parent);
        top += offsets.top;
        left += offsets.left;
        cursor = host.offset_parent(&parent);
        hops += 1;
    }

    Rect {
        top,
        left,
        width: own.width,
        height: own.height,
    }
}
