//! Edge-triggered auto-scroll while dragging.
//!
//! Pure decision logic: given a pointer position and the board extent,
//! decide whether (and how far) the board should scroll. Applying the
//! scroll is the job of an external [`ScrollContainer`], which also clamps
//! to its own bounds.

use crate::model::Position;

/// Default distance from an edge that triggers scrolling.
pub const DEFAULT_SCROLL_THRESHOLD: f32 = 50.0;

/// Default scroll distance per sample.
pub const DEFAULT_SCROLL_STEP: f32 = 8.0;

/// The scrollable container hosting the board.
pub trait ScrollContainer {
    /// Scroll by `delta` along the board axis. Negative scrolls backward.
    fn scroll_by(&mut self, delta: f32);
}

/// Axis the board scrolls along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollAxis {
    /// Columns laid out left to right.
    #[default]
    Horizontal,
    /// Columns stacked top to bottom.
    Vertical,
}

/// A scroll command issued for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    /// Signed distance; negative is backward.
    pub delta: f32,
}

/// Auto-scroll tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutoScrollConfig {
    /// Edge distance on the x axis.
    pub x_threshold: f32,
    /// Edge distance on the y axis.
    pub y_threshold: f32,
    /// Base distance per sample.
    pub step: f32,
    /// Scroll-speed multiplier.
    pub speed_factor: f32,
    /// Board axis.
    pub axis: ScrollAxis,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            x_threshold: DEFAULT_SCROLL_THRESHOLD,
            y_threshold: DEFAULT_SCROLL_THRESHOLD,
            step: DEFAULT_SCROLL_STEP,
            speed_factor: 1.0,
            axis: ScrollAxis::Horizontal,
        }
    }
}

/// Decides auto-scroll steps from pointer samples.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoScrollController {
    config: AutoScrollConfig,
    extent: f32,
}

impl AutoScrollController {
    /// Controller for a board `extent` units long along its axis.
    pub fn new(config: AutoScrollConfig, extent: f32) -> Self {
        Self { config, extent }
    }

    /// Update the board length along the scroll axis (after a resize).
    pub fn set_extent(&mut self, extent: f32) {
        self.extent = extent;
    }

    /// Board length along the scroll axis.
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Active configuration.
    pub fn config(&self) -> &AutoScrollConfig {
        &self.config
    }

    /// Edge check alone: a step iff the pointer is within the threshold of
    /// either edge, strictly.
    pub fn evaluate(&self, position: Position) -> Option<ScrollStep> {
        let (coordinate, threshold) = match self.config.axis {
            ScrollAxis::Horizontal => (position.x, self.config.x_threshold),
            ScrollAxis::Vertical => (position.y, self.config.y_threshold),
        };
        let factor = if self.config.speed_factor > 0.0 {
            self.config.speed_factor
        } else {
            1.0
        };

        if coordinate < threshold {
            Some(ScrollStep {
                delta: -(self.config.step / factor),
            })
        } else if coordinate > self.extent - threshold {
            Some(ScrollStep {
                delta: self.config.step * factor,
            })
        } else {
            None
        }
    }

    /// Step for a drag sample; only relevant while the pointer resolves to
    /// a column.
    pub fn on_sample(&self, position: Position, hit_column: bool) -> Option<ScrollStep> {
        if !hit_column {
            return None;
        }
        self.evaluate(position)
    }
}
