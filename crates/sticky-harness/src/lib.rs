#![forbid(unsafe_code)]

//! Test harness for the sticky controller.
//!
//! [`document::FakeDocument`] is an in-memory [`sticky_core::LayoutHost`]
//! with just enough layout behavior to exercise the controller: an element
//! tree, offset boxes, attributes, inline styles, and a scroll position.
//! [`trace::PlacementTrace`] records decisions for JSONL export.

pub mod document;
pub mod trace;

pub use document::{FakeDocument, FakeElement, NodeId};
pub use trace::{PlacementTrace, TraceRecord};
