//! Configuration file loading with precedence handling.

use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DRAGBOARD_CONFIG";

/// Environment variable overriding the drag speed factor.
pub const SPEED_FACTOR_ENV_VAR: &str = "DRAGBOARD_SPEED_FACTOR";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },

    /// A value parsed but is out of range.
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue {
        /// Offending key.
        key: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/dragboard/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Auto-scroll trigger distance from the left/right edge.
    #[serde(default)]
    pub x_scroll_threshold: Option<f32>,

    /// Auto-scroll trigger distance from the top/bottom edge.
    #[serde(default)]
    pub y_scroll_threshold: Option<f32>,

    /// Auto-scroll speed multiplier.
    #[serde(default)]
    pub drag_speed_factor: Option<f32>,

    /// Base auto-scroll distance per sample.
    #[serde(default)]
    pub scroll_step: Option<f32>,

    /// Hover element tilt in degrees.
    #[serde(default)]
    pub active_row_rotation: Option<f32>,

    /// Columns laid out side by side.
    #[serde(default)]
    pub horizontal: Option<bool>,

    /// Quiet window before re-measuring, in milliseconds.
    #[serde(default)]
    pub measure_debounce_ms: Option<u64>,

    /// Spring-return length, in milliseconds.
    #[serde(default)]
    pub spring_duration_ms: Option<u64>,

    /// Pointer travel that starts a drag.
    #[serde(default)]
    pub drag_slop: Option<f32>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Auto-scroll trigger distance from the left/right edge.
    pub x_scroll_threshold: f32,
    /// Auto-scroll trigger distance from the top/bottom edge.
    pub y_scroll_threshold: f32,
    /// Auto-scroll speed multiplier.
    pub drag_speed_factor: f32,
    /// Base auto-scroll distance per sample.
    pub scroll_step: f32,
    /// Hover element tilt in degrees.
    pub active_row_rotation: f32,
    /// Columns laid out side by side.
    pub horizontal: bool,
    /// Quiet window before re-measuring, in milliseconds.
    pub measure_debounce_ms: u64,
    /// Spring-return length, in milliseconds.
    pub spring_duration_ms: u64,
    /// Pointer travel that starts a drag.
    pub drag_slop: f32,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            x_scroll_threshold: 50.0,
            y_scroll_threshold: 50.0,
            drag_speed_factor: 1.0,
            scroll_step: 8.0,
            active_row_rotation: 8.0,
            horizontal: true,
            measure_debounce_ms: 100,
            spring_duration_ms: 250,
            drag_slop: 1.0,
            log_file_path: default_log_path(),
        }
    }
}

impl ResolvedConfig {
    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("x_scroll_threshold", self.x_scroll_threshold)?;
        non_negative("y_scroll_threshold", self.y_scroll_threshold)?;
        non_negative("drag_slop", self.drag_slop)?;
        positive("drag_speed_factor", self.drag_speed_factor)?;
        positive("scroll_step", self.scroll_step)?;
        if !self.active_row_rotation.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "active_row_rotation",
                reason: "must be a finite number".to_string(),
            });
        }
        Ok(())
    }
}

fn non_negative(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            reason: format!("expected a finite value >= 0, got {value}"),
        })
    }
}

fn positive(key: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key,
            reason: format!("expected a finite value > 0, got {value}"),
        })
    }
}

/// Overrides collected from command-line flags.
///
/// `None` means the flag was not given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    /// `--speed`
    pub drag_speed_factor: Option<f32>,
    /// `--vertical` maps to `Some(false)`.
    pub horizontal: Option<bool>,
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/dragboard/dragboard.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("dragboard").join("dragboard.log")
    } else {
        PathBuf::from("dragboard.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/dragboard/config.toml` on Unix, appropriate path on other platforms.
/// Returns `None` if home directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dragboard").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `DRAGBOARD_CONFIG` environment variable
/// 3. Default path `~/.config/dragboard/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV_VAR} is empty")));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for `DRAGBOARD_SPEED_FACTOR`. Unparseable values are logged and
/// ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(SPEED_FACTOR_ENV_VAR) {
        match raw.trim().parse::<f32>() {
            Ok(factor) => config.drag_speed_factor = factor,
            Err(e) => warn!(value = %raw, error = %e, "Ignoring {}", SPEED_FACTOR_ENV_VAR),
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        x_scroll_threshold: config
            .x_scroll_threshold
            .unwrap_or(defaults.x_scroll_threshold),
        y_scroll_threshold: config
            .y_scroll_threshold
            .unwrap_or(defaults.y_scroll_threshold),
        drag_speed_factor: config
            .drag_speed_factor
            .unwrap_or(defaults.drag_speed_factor),
        scroll_step: config.scroll_step.unwrap_or(defaults.scroll_step),
        active_row_rotation: config
            .active_row_rotation
            .unwrap_or(defaults.active_row_rotation),
        horizontal: config.horizontal.unwrap_or(defaults.horizontal),
        measure_debounce_ms: config
            .measure_debounce_ms
            .unwrap_or(defaults.measure_debounce_ms),
        spring_duration_ms: config
            .spring_duration_ms
            .unwrap_or(defaults.spring_duration_ms),
        drag_slop: config.drag_slop.unwrap_or(defaults.drag_slop),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only applies overrides for flags that were explicitly set by the user.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, overrides: &CliOverrides) -> ResolvedConfig {
    if let Some(factor) = overrides.drag_speed_factor {
        config.drag_speed_factor = factor;
    }

    if let Some(horizontal) = overrides.horizontal {
        config.horizontal = horizontal;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
