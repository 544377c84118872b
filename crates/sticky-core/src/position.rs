//! The pin/flow decision.
//!
//! [`decide`] is a pure function of the scroll offset, viewport height, the
//! element's natural rect and margin, and the container rect. The controller
//! turns its result into style writes; nothing about the outcome is stored.

use serde::Serialize;

use crate::geometry::Rect;
use crate::host::StyleProperty;

/// Inputs to one placement decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionInput {
    pub scroll_offset: f64,
    pub viewport_height: f64,
    pub element: Rect,
    pub margin_top: u32,
    pub container: Rect,
}

/// Why an element is left in normal flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowReason {
    /// The page has not scrolled far enough to reach the element.
    BelowThreshold,
    /// The element is taller than the viewport and cannot usefully stick.
    TallerThanViewport,
}

/// What a pinned element's `top` is aligned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// `top` equals the element's margin.
    MarginTop,
    /// Bottom edge locked to the container's bottom edge.
    ContainerBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Placement {
    Flowing { reason: FlowReason },
    Pinned {
        anchor: Anchor,
        top: f64,
        left: f64,
        width: f64,
    },
}

impl Placement {
    #[must_use]
    pub const fn is_pinned(&self) -> bool {
        matches!(self, Self::Pinned { .. })
    }

    /// Style writes for this placement, applied after all four properties
    /// have been cleared. Flowing placements write nothing.
    #[must_use]
    pub fn styles(&self) -> Vec<(StyleProperty, String)> {
        match *self {
            Self::Flowing { .. } => Vec::new(),
            Self::Pinned {
                top, left, width, ..
            } => vec![
                (StyleProperty::Position, "fixed".to_string()),
                (StyleProperty::Width, px(width)),
                (StyleProperty::Left, px(left)),
                (StyleProperty::Top, px(top)),
            ],
        }
    }
}

fn px(value: f64) -> String {
    format!("{value}px")
}

/// Decide where an element belongs at the given scroll offset.
#[must_use]
pub fn decide(input: &PositionInput) -> Placement {
    let element = input.element;
    let margin = f64::from(input.margin_top);

    if input.viewport_height < element.height {
        return Placement::Flowing {
            reason: FlowReason::TallerThanViewport,
        };
    }

    if input.scroll_offset < element.top - margin {
        return Placement::Flowing {
            reason: FlowReason::BelowThreshold,
        };
    }

    let container_bottom = input.container.bottom();
    let (anchor, top) = if input.scroll_offset + element.height + margin > container_bottom {
        (
            Anchor::ContainerBottom,
            container_bottom - input.scroll_offset - element.height,
        )
    } else {
        (Anchor::MarginTop, margin)
    };

    Placement::Pinned {
        anchor,
        top,
        left: element.left,
        width: element.width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(scroll_offset: f64) -> PositionInput {
        PositionInput {
            scroll_offset,
            viewport_height: 800.0,
            element: Rect::new(500.0, 40.0, 300.0, 100.0),
            margin_top: 20,
            container: Rect::new(0.0, 0.0, 1200.0, 1000.0),
        }
    }

    #[test]
    fn flows_before_threshold() {
        assert_eq!(
            decide(&input(400.0)),
            Placement::Flowing {
                reason: FlowReason::BelowThreshold
            }
        );
    }

    #[test]
    fn pins_at_margin_past_threshold() {
        assert_eq!(
            decide(&input(500.0)),
            Placement::Pinned {
                anchor: Anchor::MarginTop,
                top: 20.0,
                left: 40.0,
                width: 300.0,
            }
        );
    }

    #[test]
    fn pins_exactly_at_threshold() {
        assert!(decide(&input(480.0)).is_pinned());
        assert!(!decide(&input(479.5)).is_pinned());
    }

    #[test]
    fn clamps_to_container_bottom() {
        assert_eq!(
            decide(&input(900.0)),
            Placement::Pinned {
                anchor: Anchor::ContainerBottom,
                top: 0.0,
                left: 40.0,
                width: 300.0,
            }
        );
    }

    #[test]
    fn clamped_top_goes_negative_past_container() {
        let Placement::Pinned { top, anchor, .. } = decide(&input(1100.0)) else {
            panic!("expected pinned");
        };
        assert_eq!(anchor, Anchor::ContainerBottom);
        assert_eq!(top, -200.0);
    }

    #[test]
    fn too_tall_never_pins() {
        let mut tall = input(600.0);
        tall.viewport_height = 99.0;
        assert_eq!(
            decide(&tall),
            Placement::Flowing {
                reason: FlowReason::TallerThanViewport
            }
        );
    }

    #[test]
    fn pinned_styles_are_px_strings() {
        let styles = decide(&input(500.0)).styles();
        assert_eq!(
            styles,
            vec![
                (StyleProperty::Position, "fixed".to_string()),
                (StyleProperty::Width, "300px".to_string()),
                (StyleProperty::Left, "40px".to_string()),
                (StyleProperty::Top, "20px".to_string()),
            ]
        );
    }

    #[test]
    fn fractional_pixels_keep_precision() {
        assert_eq!(px(12.5), "12.5px");
        assert_eq!(px(-3.0), "-3px");
    }

    #[test]
    fn flowing_writes_nothing() {
        assert!(decide(&input(0.0)).styles().is_empty());
    }
}
