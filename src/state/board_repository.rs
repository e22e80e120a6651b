//! Canonical column/row data and the live reorder algorithm.
//!
//! The repository is the single writer of board order. During a drag every
//! pointer sample is applied to the working order immediately, so the
//! placeholder on screen and the eventual commit never disagree.

use super::session::DragSession;
use super::subscribers::{BoardChange, ChangeCallback, SubscriptionId, Subscribers};
use crate::model::{
    BoardData, BoardError, Column, ColumnId, DragItem, Position, Row, RowId,
};
use crate::view_state::handles::{ColumnHandle, ColumnHandles};
use crate::view_state::hit_test::{column_at, hit_test, HitTestResult, RowTarget};
use crate::view_state::layout_store::{LayoutKey, LayoutStore};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Repository shared between a pointer thread and the thread that renders.
///
/// The mutex enforces the single-writer rule when the reactor and the
/// resolver run on different OS threads.
pub type SharedBoard<T> = Arc<Mutex<BoardRepository<T>>>;

/// Which rows a lookup may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowVisibility {
    /// Skip rows lifted out as hover elements.
    VisibleOnly,
    /// Return hidden rows as well.
    IncludeHidden,
}

/// Owns the board's columns and rows, their measured layouts and the
/// presentation-layer subscriptions.
#[derive(Debug)]
pub struct BoardRepository<T> {
    columns: Vec<Column<T>>,
    original: Vec<Column<T>>,
    layouts: LayoutStore,
    handles: ColumnHandles,
    subscribers: Subscribers,
}

impl<T> Default for BoardRepository<T> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            original: Vec::new(),
            layouts: LayoutStore::new(),
            handles: ColumnHandles::new(),
            subscribers: Subscribers::new(),
        }
    }
}

impl<T: Clone> BoardRepository<T> {
    /// Empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Board seeded from `data`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when column or row ids are not unique.
    pub fn from_data(data: BoardData<T>) -> Result<Self, BoardError> {
        let mut repo = Self::new();
        repo.set_data(data)?;
        Ok(repo)
    }

    /// Wrap into a [`SharedBoard`].
    pub fn into_shared(self) -> SharedBoard<T> {
        Arc::new(Mutex::new(self))
    }

    /// Replace the board contents. The new order is also the baseline.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when column or row ids are not unique; the
    /// current board is left untouched in that case.
    pub fn set_data(&mut self, data: BoardData<T>) -> Result<(), BoardError> {
        let mut column_ids = HashSet::new();
        let mut row_ids = HashSet::new();
        for column in &data.columns {
            if !column_ids.insert(&column.id) {
                return Err(BoardError::DuplicateColumn(column.id.clone()));
            }
            for row in &column.rows {
                if !row_ids.insert(&row.id) {
                    return Err(BoardError::DuplicateRow(row.id.clone()));
                }
            }
        }

        self.columns = data
            .columns
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                let mut column = Column::new(source.id, source.title, index);
                let id = column.id().clone();
                column.rows_mut().extend(
                    source
                        .rows
                        .into_iter()
                        .enumerate()
                        .map(|(position, row)| Row::new(row.id, id.clone(), position, row.data)),
                );
                column
            })
            .collect();
        self.original = self.columns.clone();
        self.layouts.clear();

        debug!(columns = self.columns.len(), "Board data set");
        self.subscribers.notify(&BoardChange::DataSet);
        Ok(())
    }

    /// Current working order, for rendering.
    pub fn get_columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Owned copy of the working order.
    pub fn snapshot(&self) -> Vec<Column<T>> {
        self.columns.clone()
    }

    /// Order as of the last commit.
    pub fn original_columns(&self) -> &[Column<T>] {
        &self.original
    }

    /// Column by id.
    pub fn column(&self, id: &ColumnId) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.id() == id)
    }

    /// Row by id.
    pub fn find_row(&self, id: &RowId, visibility: RowVisibility) -> Option<&Row<T>> {
        let (column, position) = self.locate_row(id)?;
        let row = &self.columns[column].rows()[position];
        match visibility {
            RowVisibility::VisibleOnly if row.is_hidden() => None,
            _ => Some(row),
        }
    }

    /// Lift a row out of the rendered list. It keeps its place in the data
    /// so the placeholder gap persists. Returns whether anything changed.
    pub fn hide_row(&mut self, id: &RowId) -> bool {
        self.set_row_hidden(id, true)
    }

    /// Put a hidden row back. Returns whether anything changed.
    pub fn show_row(&mut self, id: &RowId) -> bool {
        self.set_row_hidden(id, false)
    }

    /// Apply one drag sample to the working order.
    ///
    /// Hit-tests `position`; when it lands in a column, moves the dragged
    /// row there (column change) or reorders it in place (row hit in the
    /// same column). `on_column_changed(previous, new)` fires once per
    /// column transition. Returns the hit column, or `None` when the
    /// pointer is outside every measured column, in which case nothing
    /// changes.
    pub fn move_row<F>(
        &mut self,
        session: &mut DragSession,
        position: Position,
        mut on_column_changed: F,
    ) -> Option<ColumnId>
    where
        F: FnMut(&ColumnId, &ColumnId),
    {
        let row_id = session.dragged_row()?.clone();
        let hit = hit_test(&self.columns, &self.layouts, position, Some(&row_id));
        let HitTestResult::Hit {
            column,
            column_index: to,
            target,
        } = hit
        else {
            trace!(x = position.x, y = position.y, "Sample outside every column");
            return None;
        };

        let Some((from, from_position)) = self.locate_row(&row_id) else {
            warn!(row = %row_id, "Dragged row is not on the board");
            return None;
        };

        let previous = session.current_column().clone();
        let column_changed = previous != column;
        let insertion = target.insertion();
        let wants_move = column_changed || matches!(target, RowTarget::On { .. });
        let in_place = from == to && insertion == from_position;

        if wants_move && !in_place {
            let source = self.columns[from].id().clone();
            let row = self.columns[from].remove_row(from_position);
            self.columns[to].insert_row(insertion, row);
            let index = self.columns[to].position_of(&row_id).unwrap_or(insertion);
            trace!(row = %row_id, from = %source, to = %column, index, "Row moved");
            self.subscribers.notify(&BoardChange::RowMoved {
                row: row_id,
                from: source,
                to: column.clone(),
                index,
            });
        }

        if column_changed {
            debug!(from = %previous, to = %column, "Dragged row changed column");
            session.set_current_column(column.clone());
            on_column_changed(&previous, &column);
        }

        Some(column)
    }

    /// Apply one sample of a whole-column drag.
    ///
    /// Hit-tests columns on `x` only and moves the dragged column to the hit
    /// column's position. Rows are untouched. All layouts become stale since
    /// every column after the move point has shifted.
    pub fn move_column(&mut self, session: &DragSession, position: Position) -> Option<ColumnId> {
        let DragItem::Column(dragged) = session.item() else {
            return None;
        };
        let to = column_at(&self.columns, &self.layouts, position.x)?;
        let target = self.columns[to].id().clone();
        let Some(from) = self.columns.iter().position(|c| c.id() == dragged) else {
            warn!(column = %dragged, "Dragged column is not on the board");
            return None;
        };

        if from != to {
            let column = self.columns.remove(from);
            self.columns.insert(to, column);
            for (index, column) in self.columns.iter_mut().enumerate() {
                column.set_index(index);
            }
            self.layouts.invalidate_all();
            debug!(column = %dragged, index = to, "Column moved");
            self.subscribers.notify(&BoardChange::ColumnMoved {
                column: dragged.clone(),
                index: to,
            });
        }

        Some(target)
    }

    /// Re-measure every column that has a mounted handle.
    ///
    /// Returns how many columns were measured. Unmounted columns are
    /// skipped silently.
    pub fn measure_columns_layout(&mut self) -> usize {
        let ids: Vec<ColumnId> = self.columns.iter().map(|c| c.id().clone()).collect();
        let mut measured = 0;
        for id in &ids {
            if self.update_column_layout(id) {
                measured += 1;
            }
        }
        trace!(measured, total = ids.len(), "Measured column layouts");
        measured
    }

    /// Re-measure one column and its rows through its handle.
    pub fn update_column_layout(&mut self, id: &ColumnId) -> bool {
        let Some(index) = self.columns.iter().position(|c| c.id() == id) else {
            return false;
        };
        let Some(handle) = self.handles.get(id) else {
            return false;
        };
        let Some(rect) = handle.measure() else {
            trace!(column = %id, "Column not mounted, skipping measurement");
            return false;
        };

        self.layouts.record_layout(id.clone(), rect);
        for row in self.columns[index].rows() {
            if let Some(rect) = handle.measure_row(row.id()) {
                self.layouts.record_layout(row.id().clone(), rect);
            }
        }
        true
    }

    /// Register the presentation handle for a column.
    pub fn update_column_ref(&mut self, id: ColumnId, handle: Box<dyn ColumnHandle>) {
        self.handles.register(id, handle);
    }

    /// Unregister a column's handle and forget its layout.
    pub fn remove_column_ref(&mut self, id: &ColumnId) -> bool {
        self.layouts.remove(&LayoutKey::Column(id.clone()));
        self.handles.unregister(id)
    }

    /// Mark every layout stale (scroll, resize, reflow).
    pub fn invalidate_layouts(&mut self) {
        self.layouts.invalidate_all();
    }

    /// Measured layouts.
    pub fn layouts(&self) -> &LayoutStore {
        &self.layouts
    }

    /// Measured layouts, for presentation layers that record directly.
    pub fn layouts_mut(&mut self) -> &mut LayoutStore {
        &mut self.layouts
    }

    /// Commit the working order as the new baseline.
    pub fn update_original_data(&mut self) {
        self.original = self.columns.clone();
        debug!("Committed board order");
        self.subscribers.notify(&BoardChange::Committed);
    }

    /// Register `callback` as the only change subscriber.
    pub fn set_reload(&mut self, callback: ChangeCallback) -> SubscriptionId {
        self.subscribers.replace_all(callback)
    }

    /// Add a change subscriber.
    pub fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    /// Remove a change subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// `(column position, row position)` of a row, hidden rows included.
    pub fn locate_row(&self, id: &RowId) -> Option<(usize, usize)> {
        self.columns
            .iter()
            .enumerate()
            .find_map(|(ci, column)| column.position_of(id).map(|ri| (ci, ri)))
    }

    fn set_row_hidden(&mut self, id: &RowId, hidden: bool) -> bool {
        let Some((column, position)) = self.locate_row(id) else {
            warn!(row = %id, hidden, "Visibility change for unknown row");
            return false;
        };
        let row = &mut self.columns[column].rows_mut()[position];
        if row.is_hidden() == hidden {
            return false;
        }
        row.set_hidden(hidden);

        let change = if hidden {
            BoardChange::RowHidden(id.clone())
        } else {
            BoardChange::RowShown(id.clone())
        };
        self.subscribers.notify(&change);
        true
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "board_repository_tests.rs"]
mod tests;
