//! Controller configuration and per-element attribute parsing.

/// Attribute names the controller reads from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StickyConfig {
    /// Attribute holding the element's top margin in pixels.
    /// Default: `data-margin-top`.
    pub margin_attribute: String,

    /// Presence-only attribute marking a bounding container.
    /// Default: `data-sticky-container`.
    pub container_attribute: String,
}

impl Default for StickyConfig {
    fn default() -> Self {
        Self {
            margin_attribute: "data-margin-top".to_string(),
            container_attribute: "data-sticky-container".to_string(),
        }
    }
}

impl StickyConfig {
    #[must_use]
    pub fn margin_attribute(mut self, name: impl Into<String>) -> Self {
        self.margin_attribute = name.into();
        self
    }

    #[must_use]
    pub fn container_attribute(mut self, name: impl Into<String>) -> Self {
        self.container_attribute = name.into();
        self
    }
}

/// Parse a top-margin attribute value.
///
/// Reads a leading decimal integer the way `parseInt` does, so `"20px"` is 20.
/// Absent, empty, non-numeric and negative values all give 0; values too
/// large for `u32` saturate.
#[must_use]
pub fn parse_margin_top(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 || negative {
        return 0;
    }

    digits[..end].bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}
