//! The ephemeral record of the drag in progress.

use crate::model::{ColumnId, DragItem, RowId};

/// What is being dragged, where it came from and where it hovers now.
///
/// Exists only between drag start and drag end/cancel; the gesture
/// controller guarantees there is at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    item: DragItem,
    origin_column: ColumnId,
    current_column: ColumnId,
}

impl DragSession {
    /// Start tracking `item`, lifted from `origin_column`.
    pub fn new(item: DragItem, origin_column: ColumnId) -> Self {
        Self {
            item,
            current_column: origin_column.clone(),
            origin_column,
        }
    }

    /// The dragged item.
    pub fn item(&self) -> &DragItem {
        &self.item
    }

    /// The dragged row, for row drags.
    pub fn dragged_row(&self) -> Option<&RowId> {
        match &self.item {
            DragItem::Row(id) => Some(id),
            DragItem::Column(_) => None,
        }
    }

    /// Column the drag started in.
    pub fn origin_column(&self) -> &ColumnId {
        &self.origin_column
    }

    /// Column of the last successful hit-test.
    pub fn current_column(&self) -> &ColumnId {
        &self.current_column
    }

    pub(crate) fn set_current_column(&mut self, column: ColumnId) {
        self.current_column = column;
    }
}
