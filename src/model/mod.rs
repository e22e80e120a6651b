//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod board;
pub mod error;
pub mod geometry;
pub mod identifiers;
pub mod key_action;

// Re-export for convenience
pub use board::{BoardData, Column, ColumnData, DragItem, Row, RowData};
pub use error::{AppError, BoardError, LoadError};
pub use geometry::{Position, Rect};
pub use identifiers::{ColumnId, InvalidColumnId, InvalidRowId, RowId};
pub use key_action::KeyAction;
