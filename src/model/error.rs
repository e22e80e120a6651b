//! Error types for dragboard.
//!
//! The drag engine itself never fails: queries on unmeasured or missing
//! entities return `None` and callers take no action. Errors exist only at
//! the edges of the system - building a board from data, loading that data,
//! configuration, logging and the terminal.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary
//!   - [`LoadError`] - Board file reading and JSON decoding failures
//!   - [`BoardError`] - Structurally invalid board data (duplicate ids)
//!   - [`ConfigError`](crate::config::ConfigError) - Config file problems
//!   - [`LoggingError`](crate::logging::LoggingError) - Subscriber setup
//!   - `std::io::Error` - Terminal failures

use super::identifiers::{ColumnId, RowId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to load the board file.
    #[error("Failed to load board: {0}")]
    Load(#[from] LoadError),

    /// Board data was rejected by the repository.
    #[error("Invalid board: {0}")]
    Board(#[from] BoardError),

    /// Configuration could not be loaded or validated.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Board data that violates the repository's structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    /// Two columns share an identifier.
    #[error("Duplicate column id: {0}")]
    DuplicateColumn(ColumnId),

    /// A row identifier appears more than once across the board.
    #[error("Duplicate row id: {0}")]
    DuplicateRow(RowId),
}

/// Errors encountered when reading board data from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The board file does not exist.
    #[error("Board file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// The board file exists but is not valid board JSON.
    #[error("Invalid board JSON in {path}: {reason}")]
    Json {
        /// Offending file.
        path: PathBuf,
        /// Decoder message, including line and column.
        reason: String,
    },

    /// Generic I/O failure while reading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
