//! Configuration module.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, CliOverrides, ConfigError,
    ConfigFile, ResolvedConfig,
};

use crate::view_state::auto_scroll::{AutoScrollConfig, ScrollAxis};
use std::time::Duration;

/// Engine tuning consumed by the drag machinery.
///
/// Derived from [`ResolvedConfig`]; embedders that do not load config files
/// can build one directly or start from `Default`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Distance from the left/right edge that triggers auto-scroll.
    pub x_scroll_threshold: f32,
    /// Distance from the top/bottom edge that triggers auto-scroll.
    pub y_scroll_threshold: f32,
    /// Scroll-speed multiplier.
    pub drag_speed_factor: f32,
    /// Base auto-scroll distance per sample.
    pub scroll_step: f32,
    /// Tilt of the floating hover element, in degrees.
    pub active_row_rotation: f32,
    /// Board scrolls horizontally (columns side by side).
    pub horizontal: bool,
    /// Quiet window before re-measuring after scrolling.
    pub measure_debounce: Duration,
    /// Length of the spring-return tween.
    pub spring_duration: Duration,
    /// Pointer travel that turns a press into a drag.
    pub drag_slop: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&ResolvedConfig::default())
    }
}

impl From<&ResolvedConfig> for EngineConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            x_scroll_threshold: config.x_scroll_threshold,
            y_scroll_threshold: config.y_scroll_threshold,
            drag_speed_factor: config.drag_speed_factor,
            scroll_step: config.scroll_step,
            active_row_rotation: config.active_row_rotation,
            horizontal: config.horizontal,
            measure_debounce: Duration::from_millis(config.measure_debounce_ms),
            spring_duration: Duration::from_millis(config.spring_duration_ms),
            drag_slop: config.drag_slop,
        }
    }
}

impl EngineConfig {
    /// Auto-scroll policy for this configuration.
    pub fn auto_scroll(&self) -> AutoScrollConfig {
        AutoScrollConfig {
            x_threshold: self.x_scroll_threshold,
            y_threshold: self.y_scroll_threshold,
            step: self.scroll_step,
            speed_factor: self.drag_speed_factor,
            axis: if self.horizontal {
                ScrollAxis::Horizontal
            } else {
                ScrollAxis::Vertical
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_engine_config_matches_documented_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.x_scroll_threshold, 50.0);
        assert_eq!(config.y_scroll_threshold, 50.0);
        assert_eq!(config.drag_speed_factor, 1.0);
        assert_eq!(config.scroll_step, 8.0);
        assert_eq!(config.active_row_rotation, 8.0);
        assert!(config.horizontal);
    }

    #[test]
    fn vertical_board_scrolls_on_y() {
        let config = EngineConfig {
            horizontal: false,
            ..EngineConfig::default()
        };
        assert_eq!(config.auto_scroll().axis, ScrollAxis::Vertical);
    }
}
