//! Column handle table.
//!
//! The presentation layer registers one handle per mounted column. The
//! repository asks handles for fresh geometry when re-measuring.

use crate::model::{ColumnId, Rect, RowId};
use std::collections::HashMap;
use std::fmt;

/// Measurement access to a rendered column.
///
/// Returning `None` means the column (or row) is not currently mounted; the
/// caller skips it silently.
pub trait ColumnHandle: Send {
    /// Current rectangle of the column.
    fn measure(&self) -> Option<Rect>;

    /// Current rectangle of one of the column's rows.
    fn measure_row(&self, row: &RowId) -> Option<Rect>;
}

/// Handle table keyed by column id.
#[derive(Default)]
pub struct ColumnHandles {
    handles: HashMap<ColumnId, Box<dyn ColumnHandle>>,
}

impl ColumnHandles {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handle for a column.
    pub fn register(&mut self, id: ColumnId, handle: Box<dyn ColumnHandle>) {
        self.handles.insert(id, handle);
    }

    /// Drop the handle for a column. Returns whether one was registered.
    pub fn unregister(&mut self, id: &ColumnId) -> bool {
        self.handles.remove(id).is_some()
    }

    /// Handle for a column, if mounted.
    pub fn get(&self, id: &ColumnId) -> Option<&dyn ColumnHandle> {
        self.handles.get(id).map(|h| h.as_ref())
    }

    /// Number of registered handles.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// No handles registered.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Drop every handle.
    pub fn clear(&mut self) {
        self.handles.clear();
    }
}

impl fmt::Debug for ColumnHandles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.handles.keys().collect();
        ids.sort();
        f.debug_struct("ColumnHandles").field("columns", &ids).finish()
    }
}

/// Handle reporting fixed geometry.
///
/// Useful for embedders whose layout is computed up front, and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticColumnHandle {
    column: Option<Rect>,
    rows: HashMap<RowId, Rect>,
}

impl StaticColumnHandle {
    /// Handle for a column at `rect` with no rows measured yet.
    pub fn new(rect: Rect) -> Self {
        Self {
            column: Some(rect),
            rows: HashMap::new(),
        }
    }

    /// Handle that behaves like an unmounted column.
    pub fn unmounted() -> Self {
        Self::default()
    }

    /// Add a row rectangle.
    pub fn with_row(mut self, row: RowId, rect: Rect) -> Self {
        self.rows.insert(row, rect);
        self
    }
}

impl ColumnHandle for StaticColumnHandle {
    fn measure(&self) -> Option<Rect> {
        self.column
    }

    fn measure_row(&self, row: &RowId) -> Option<Rect> {
        self.rows.get(row).copied()
    }
}
