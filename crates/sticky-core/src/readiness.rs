//! Document readiness.
//!
//! Activation has to wait until the document has been parsed far enough for
//! layout queries to mean something. [`ReadinessGate`] turns the stream of
//! ready-state observations into a single activation signal.

/// Parsing state of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Interactive | Self::Complete)
    }

    /// Map a `document.readyState` string. Unknown values count as loading.
    #[must_use]
    pub fn from_dom(value: &str) -> Self {
        match value {
            "interactive" => Self::Interactive,
            "complete" => Self::Complete,
            _ => Self::Loading,
        }
    }
}

/// One-shot latch that opens on the first ready observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadinessGate {
    fired: bool,
}

impl ReadinessGate {
    #[must_use]
    pub const fn new() -> Self {
        Self { fired: false }
    }

    /// Returns `true` only for the first ready `state` ever observed.
    pub fn observe(&mut self, state: ReadyState) -> bool {
        if self.fired || !state.is_ready() {
            return false;
        }
        self.fired = true;
        true
    }

    #[must_use]
    pub const fn has_fired(&self) -> bool {
        self.fired
    }
}
