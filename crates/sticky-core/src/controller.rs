//! The sticky controller loop.
//!
//! # Lifecycle
//!
//! 1. [`StickyController::new`] selects the targets and caches the viewport
//!    and scroll offset. No element is touched yet.
//! 2. Once the document is ready ([`StickyController::on_ready_state`]) every
//!    target is activated: its margin is read, its natural rect and container
//!    are measured, and an initial placement is applied.
//! 3. The embedder forwards per-element [`StickyEvent`]s. Scroll events
//!    re-decide placement; resize and image-load events re-measure first.
//! 4. [`StickyController::update`] re-syncs everything after layout changes
//!    the controller cannot observe.
//!
//! An element is either flowing or pinned. Which one, and where a pinned
//! element's `top` goes, is recomputed on every decision and never stored.

use crate::config::{StickyConfig, parse_margin_top};
use crate::geometry::{Rect, Viewport, document_rect};
use crate::host::{LayoutHost, StyleProperty};
use crate::position::{Placement, PositionInput, decide};
use crate::readiness::{ReadinessGate, ReadyState};
use crate::registry::{ContainerState, Registry, StickyId, StickyState};

/// Upper bound on parent hops when resolving a container.
const MAX_ANCESTOR_WALK: usize = 4096;

/// Host events routed to a single managed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickyEvent {
    Scroll,
    Resize,
    ImageLoaded,
}

/// Find the bounding container for `node`.
///
/// Walks from `node` itself up through its parents and returns the first one
/// carrying `attribute`. Reaching the document root, or running out of
/// parents in a detached subtree, yields the document root.
pub fn resolve_container<H: LayoutHost>(host: &H, node: &H::Node, attribute: &str) -> H::Node {
    let root = host.document_root();
    let mut current = node.clone();
    for _ in 0..MAX_ANCESTOR_WALK {
        if current == root || host.has_attribute(&current, attribute) {
            return current;
        }
        match host.parent(&current) {
            Some(parent) => current = parent,
            None => return root,
        }
    }
    root
}

pub struct StickyController<H: LayoutHost> {
    host: H,
    config: StickyConfig,
    selector: String,
    targets: Vec<H::Node>,
    registry: Registry<H::Node>,
    gate: ReadinessGate,
    viewport: Viewport,
    scroll_offset: f64,
}

impl<H: LayoutHost> StickyController<H> {
    /// Select every element matching `selector` with default attribute names.
    pub fn new(host: H, selector: impl Into<String>) -> Self {
        Self::with_config(host, selector, StickyConfig::default())
    }

    pub fn with_config(host: H, selector: impl Into<String>, config: StickyConfig) -> Self {
        let selector = selector.into();
        let targets = host.query_all(&selector);
        let viewport = host.viewport();
        let scroll_offset = host.scroll_offset();

        tracing::debug!(
            selector = %selector,
            matched = targets.len(),
            viewport_height = viewport.height,
            scroll_offset,
            "sticky controller created"
        );

        Self {
            host,
            config,
            selector,
            targets,
            registry: Registry::new(),
            gate: ReadinessGate::new(),
            viewport,
            scroll_offset,
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[must_use]
    pub fn config(&self) -> &StickyConfig {
        &self.config
    }

    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Elements matched at construction.
    #[must_use]
    pub fn targets(&self) -> &[H::Node] {
        &self.targets
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Whether activation has run.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gate.has_fired()
    }

    #[must_use]
    pub fn state(&self, id: StickyId) -> Option<&StickyState<H::Node>> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn node(&self, id: StickyId) -> Option<&H::Node> {
        self.registry.node(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = StickyId> + use<H> {
        self.registry.ids()
    }

    /// Feed a document ready-state observation. Activates all targets the
    /// first time a ready state is seen and returns the activated ids;
    /// returns an empty list otherwise.
    pub fn on_ready_state(&mut self, state: ReadyState) -> Vec<StickyId> {
        if !self.gate.observe(state) {
            return Vec::new();
        }
        self.activate_targets()
    }

    /// Activate immediately if the host already reports a ready document.
    pub fn activate(&mut self) -> Vec<StickyId> {
        let state = self.host.ready_state();
        self.on_ready_state(state)
    }

    fn activate_targets(&mut self) -> Vec<StickyId> {
        let targets = self.targets.clone();
        let ids: Vec<StickyId> = targets
            .into_iter()
            .map(|node| self.activate_one(node))
            .collect();

        tracing::debug!(selector = %self.selector, activated = ids.len(), "sticky targets activated");
        ids
    }

    fn activate_one(&mut self, node: H::Node) -> StickyId {
        let margin_top = parse_margin_top(
            self.host
                .attribute(&node, &self.config.margin_attribute)
                .as_deref(),
        );
        let rect = document_rect(&self.host, &node);
        let image = self.host.is_image(&node);
        let container_node = resolve_container(&self.host, &node, &self.config.container_attribute);
        let container_rect = document_rect(&self.host, &container_node);

        let id = self.registry.insert(
            node,
            StickyState {
                margin_top,
                rect,
                container: ContainerState {
                    node: container_node,
                    rect: container_rect,
                },
                image,
            },
        );

        tracing::trace!(
            id = id.index(),
            margin_top,
            top = rect.top,
            height = rect.height,
            container_bottom = container_rect.bottom(),
            image,
            "sticky element registered"
        );

        self.set_position(id);
        id
    }

    /// Handle a host event for one element. Events for unknown or detached
    /// elements are ignored.
    pub fn handle_event(&mut self, id: StickyId, event: StickyEvent) -> Option<Placement> {
        let node = self.registry.node(id)?;
        if !self.host.is_connected(node) {
            tracing::trace!(id = id.index(), ?event, "ignoring event for detached element");
            return None;
        }

        match event {
            StickyEvent::Scroll => {
                self.scroll_offset = self.host.scroll_offset();
            }
            StickyEvent::Resize => {
                self.viewport = self.host.viewport();
                self.update_rect(id);
            }
            StickyEvent::ImageLoaded => {
                self.update_rect(id);
            }
        }
        self.set_position(id)
    }

    /// Re-decide and apply the placement of one element using the cached
    /// viewport and scroll offset. Detached elements are left untouched.
    pub fn set_position(&mut self, id: StickyId) -> Option<Placement> {
        let node = self.registry.node(id)?;
        if !self.host.is_connected(node) {
            return None;
        }
        let state = self.registry.get(id)?;

        let placement = decide(&PositionInput {
            scroll_offset: self.scroll_offset,
            viewport_height: self.viewport.height,
            element: state.rect,
            margin_top: state.margin_top,
            container: state.container.rect,
        });

        clear_position_styles(&self.host, node);
        for (property, value) in placement.styles() {
            self.host.set_style(node, property, &value);
        }

        tracing::trace!(
            id = id.index(),
            scroll_offset = self.scroll_offset,
            ?placement,
            "sticky placement applied"
        );
        Some(placement)
    }

    /// Strip positioning styles and re-measure the element and its container.
    /// Detached elements keep their last measured geometry and styles.
    pub fn update_rect(&mut self, id: StickyId) -> Option<Rect> {
        let node = self.registry.node(id)?.clone();
        if !self.host.is_connected(&node) {
            tracing::trace!(id = id.index(), "skipping re-measure of detached element");
            return None;
        }
        clear_position_styles(&self.host, &node);

        let rect = document_rect(&self.host, &node);
        let state = self.registry.get_mut(id)?;
        let container_rect = document_rect(&self.host, &state.container.node);
        state.rect = rect;
        state.container.rect = container_rect;
        Some(rect)
    }

    /// Re-measure and re-position every managed element.
    pub fn update(&mut self) {
        for id in self.registry.ids() {
            self.update_rect(id);
            self.set_position(id);
        }
    }
}

fn clear_position_styles<H: LayoutHost>(host: &H, node: &H::Node) {
    for property in StyleProperty::ALL {
        host.clear_style(node, property);
    }
}
