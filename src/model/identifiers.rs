//! Core identifier newtypes with smart constructors.
//!
//! All identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use serde::Deserialize;
use std::fmt;

/// Stable identifier of a board column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct ColumnId(String);

impl ColumnId {
    /// Smart constructor: validates non-empty column ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidColumnId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidColumnId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ColumnId {
    type Error = InvalidColumnId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

/// Identifier of a row (card). Unique across the whole board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub struct RowId(String);

impl RowId {
    /// Smart constructor: validates non-empty row ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidRowId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidRowId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RowId {
    type Error = InvalidRowId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

// ===== Error Types =====

/// Rejected column identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidColumnId {
    /// The identifier was the empty string.
    #[error("Column ID cannot be empty")]
    Empty,
}

/// Rejected row identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRowId {
    /// The identifier was the empty string.
    #[error("Row ID cannot be empty")]
    Empty,
}

// ===== Tests =====
