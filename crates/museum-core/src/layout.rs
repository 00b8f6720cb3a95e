//! Responsive breakpoint shared by the shell and module pages.

use serde::{Deserialize, Serialize};

/// Widest viewport (logical px) still laid out as mobile.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    /// Stacked arrangement, viewport ≤ 768px.
    Mobile,
    /// Sticky sidebar arrangement.
    Desktop,
}

impl LayoutMode {
    #[inline]
    pub fn for_width(viewport_width: f64) -> Self {
        if viewport_width <= MOBILE_BREAKPOINT_PX {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_inclusive_for_mobile() {
        assert_eq!(LayoutMode::for_width(320.0), LayoutMode::Mobile);
        assert_eq!(LayoutMode::for_width(768.0), LayoutMode::Mobile);
        assert_eq!(LayoutMode::for_width(768.5), LayoutMode::Desktop);
        assert_eq!(LayoutMode::for_width(769.0), LayoutMode::Desktop);
        assert_eq!(LayoutMode::for_width(1920.0), LayoutMode::Desktop);
    }
}
