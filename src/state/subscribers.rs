//! Change notification for the presentation layer.
//!
//! An explicit subscriber list owned by each repository instance. Nothing
//! here is process-wide.

use crate::model::{ColumnId, RowId};
use std::fmt;

/// A structural change the presentation layer must re-render for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardChange {
    /// Board data was replaced.
    DataSet,
    /// A row moved, within a column or across columns.
    RowMoved {
        /// The row.
        row: RowId,
        /// Column it left.
        from: ColumnId,
        /// Column it now belongs to.
        to: ColumnId,
        /// New position in `to`.
        index: usize,
    },
    /// A column moved to a new position.
    ColumnMoved {
        /// The column.
        column: ColumnId,
        /// New position.
        index: usize,
    },
    /// A row was lifted out as a hover element.
    RowHidden(RowId),
    /// A row was put back.
    RowShown(RowId),
    /// The working order became the new baseline.
    Committed,
}

/// Callback invoked on every [`BoardChange`].
pub type ChangeCallback = Box<dyn FnMut(&BoardChange) + Send>;

/// Token returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered list of change callbacks.
#[derive(Default)]
pub struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, ChangeCallback)>,
}

impl Subscribers {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback.
    pub fn subscribe(&mut self, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    /// Remove a callback. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    /// Drop every callback and register `callback` as the only one.
    pub fn replace_all(&mut self, callback: ChangeCallback) -> SubscriptionId {
        self.entries.clear();
        self.subscribe(callback)
    }

    /// Invoke every callback in registration order.
    pub fn notify(&mut self, change: &BoardChange) {
        for (_, callback) in &mut self.entries {
            callback(change);
        }
    }

    /// Number of callbacks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No callbacks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}
