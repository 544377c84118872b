//! Per-element state owned by the controller.
//!
//! Each managed element gets exactly one [`StickyState`], created at
//! activation and replaced field-by-field on re-measurement. Records are never
//! shared between elements and nothing is stored on the host's nodes.

use crate::geometry::Rect;

/// Identity of a managed element within one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StickyId(usize);

impl StickyId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The bounding container an element may not travel past.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerState<N> {
    pub node: N,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StickyState<N> {
    /// Pixels to keep between the viewport top and a pinned element.
    /// Fixed at activation.
    pub margin_top: u32,
    /// Natural geometry of the element.
    pub rect: Rect,
    pub container: ContainerState<N>,
    /// Element is an image; its box may change when the resource loads.
    pub image: bool,
}

#[derive(Debug, Clone)]
struct Entry<N> {
    node: N,
    state: StickyState<N>,
}

/// Mapping from [`StickyId`] to the managed node and its state.
#[derive(Debug, Clone)]
pub struct Registry<N> {
    entries: Vec<Entry<N>>,
}

impl<N> Default for Registry<N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<N> Registry<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: N, state: StickyState<N>) -> StickyId {
        let id = StickyId(self.entries.len());
        self.entries.push(Entry { node, state });
        id
    }

    #[must_use]
    pub fn get(&self, id: StickyId) -> Option<&StickyState<N>> {
        self.entries.get(id.0).map(|e| &e.state)
    }

    pub fn get_mut(&mut self, id: StickyId) -> Option<&mut StickyState<N>> {
        self.entries.get_mut(id.0).map(|e| &mut e.state)
    }

    #[must_use]
    pub fn node(&self, id: StickyId) -> Option<&N> {
        self.entries.get(id.0).map(|e| &e.node)
    }

    /// Ids in activation order.
    pub fn ids(&self) -> impl Iterator<Item = StickyId> + use<N> {
        (0..self.entries.len()).map(StickyId)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
