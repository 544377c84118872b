#![forbid(unsafe_code)]

//! Core: geometry, readiness, element registry, and the sticky decision loop.
//!
//! Nothing in this crate touches a browser. All layout queries and style
//! writes go through [`host::LayoutHost`], so the controller can be driven by
//! a real DOM (see `sticky-web`) or by a deterministic fake in tests.

pub mod config;
pub mod controller;
pub mod geometry;
pub mod host;
pub mod position;
pub mod readiness;
pub mod registry;

pub use config::{StickyConfig, parse_margin_top};
pub use controller::{StickyController, StickyEvent, resolve_container};
pub use geometry::{OffsetBox, Rect, Viewport, document_rect};
pub use host::{LayoutHost, StyleProperty};
pub use position::{Anchor, FlowReason, Placement, PositionInput, decide};
pub use readiness::{ReadinessGate, ReadyState};
pub use registry::{ContainerState, Registry, StickyId, StickyState};
