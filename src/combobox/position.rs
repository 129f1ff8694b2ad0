//! Panel placement.
//!
//! The panel is drawn in document coordinates, directly under the control
//! and exactly as wide. The host reports the control's viewport rectangle
//! and the current scroll offset whenever either changes.

/// The control's bounding box in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Anchor {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Anchor {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

/// Gap between the control and the panel.
pub const PANEL_GAP: f64 = 4.0;

/// Where the panel sits in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPosition {
    pub top: f64,
    pub left: f64,
    pub width: f64,
}

impl PanelPosition {
    pub fn below(anchor: Anchor, scroll: ScrollOffset) -> Self {
        Self {
            top: anchor.bottom() + scroll.y + PANEL_GAP,
            left: anchor.left + scroll.x,
            width: anchor.width,
        }
    }
}
