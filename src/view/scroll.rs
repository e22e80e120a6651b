//! Board scroll offset.

use crate::view_state::auto_scroll::ScrollContainer;

/// Scroll position of the board along its scroll axis, in board units.
///
/// Requests past either end are clamped here; the engine never clamps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoardScroll {
    offset: f32,
    max: f32,
}

impl BoardScroll {
    /// Scrolled to the start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Set how far the board can scroll (content minus viewport).
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.offset = self.offset.min(self.max);
    }
}

impl ScrollContainer for BoardScroll {
    fn scroll_by(&mut self, delta: f32) {
        self.offset = (self.offset + delta).clamp(0.0, self.max);
    }
}
