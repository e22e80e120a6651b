//! Layout dimension constants for TUI rendering.
//!
//! Centralized location for all layout-related numeric values to enable
//! consistent tuning across the application.

use std::time::Duration;

/// Width of one column in cells, borders included.
pub const COLUMN_WIDTH: u16 = 24;

/// Blank cells between adjacent columns.
pub const COLUMN_GAP: u16 = 1;

/// Height of one card in lines, borders included.
pub const CARD_HEIGHT: u16 = 3;

/// Height of the status bar in lines.
///
/// Single line for drag feedback and keyboard hints.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Board units per terminal cell, horizontally.
///
/// The engine thinks in pointer units; a cell is roughly eight of them wide
/// so the default thresholds and scroll step feel right in a terminal.
pub const CELL_WIDTH_UNITS: f32 = 8.0;

/// Board units per terminal cell, vertically.
pub const CELL_HEIGHT_UNITS: f32 = 16.0;

/// Frame interval while a drag or spring is running (~60fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Poll interval when nothing is animating.
pub const IDLE_INTERVAL: Duration = Duration::from_millis(250);
