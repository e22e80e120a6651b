//! Measured rectangles for columns and rows.
//!
//! A pure cache: it never measures anything itself. Entries recorded before
//! the last [`LayoutStore::invalidate_all`] are kept but reported as stale,
//! and hit-testing only trusts valid entries.

use crate::model::{ColumnId, Rect, RowId};
use std::collections::HashMap;

/// Entity a rectangle belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayoutKey {
    /// A column's outer rectangle.
    Column(ColumnId),
    /// A single row's rectangle.
    Row(RowId),
}

impl From<ColumnId> for LayoutKey {
    fn from(id: ColumnId) -> Self {
        Self::Column(id)
    }
}

impl From<RowId> for LayoutKey {
    fn from(id: RowId) -> Self {
        Self::Row(id)
    }
}

/// Result of looking up a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measured {
    /// Never measured (or removed).
    Absent,
    /// Measured before the last invalidation; position may be wrong.
    Stale(Rect),
    /// Measured since the last invalidation.
    Valid(Rect),
}

impl Measured {
    /// The rectangle, only if it can be trusted.
    pub fn valid(self) -> Option<Rect> {
        match self {
            Self::Valid(rect) => Some(rect),
            Self::Absent | Self::Stale(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    rect: Rect,
    generation: u64,
}

/// Cache of measured layouts keyed by column and row id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutStore {
    columns: HashMap<ColumnId, Entry>,
    rows: HashMap<RowId, Entry>,
    generation: u64,
}

impl LayoutStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the rectangle for an entity, marking it valid.
    pub fn record_layout(&mut self, key: impl Into<LayoutKey>, rect: Rect) {
        let entry = Entry {
            rect,
            generation: self.generation,
        };
        match key.into() {
            LayoutKey::Column(id) => {
                self.columns.insert(id, entry);
            }
            LayoutKey::Row(id) => {
                self.rows.insert(id, entry);
            }
        }
    }

    /// Valid rectangle for an entity, `None` if absent or stale.
    pub fn layout_of(&self, key: &LayoutKey) -> Option<Rect> {
        self.lookup(key).valid()
    }

    /// Full lookup distinguishing absent, stale and valid.
    pub fn lookup(&self, key: &LayoutKey) -> Measured {
        let entry = match key {
            LayoutKey::Column(id) => self.columns.get(id),
            LayoutKey::Row(id) => self.rows.get(id),
        };
        self.classify(entry)
    }

    /// Valid column rectangle.
    pub fn column_layout(&self, id: &ColumnId) -> Option<Rect> {
        self.classify(self.columns.get(id)).valid()
    }

    /// Valid row rectangle.
    pub fn row_layout(&self, id: &RowId) -> Option<Rect> {
        self.classify(self.rows.get(id)).valid()
    }

    /// Mark every stored rectangle stale.
    pub fn invalidate_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Forget an entity entirely.
    pub fn remove(&mut self, key: &LayoutKey) {
        match key {
            LayoutKey::Column(id) => {
                self.columns.remove(id);
            }
            LayoutKey::Row(id) => {
                self.rows.remove(id);
            }
        }
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.columns.clear();
        self.rows.clear();
    }

    /// Number of valid entries.
    pub fn valid_count(&self) -> usize {
        let generation = self.generation;
        self.columns
            .values()
            .chain(self.rows.values())
            .filter(|e| e.generation == generation)
            .count()
    }

    fn classify(&self, entry: Option<&Entry>) -> Measured {
        match entry {
            None => Measured::Absent,
            Some(e) if e.generation == self.generation => Measured::Valid(e.rect),
            Some(e) => Measured::Stale(e.rect),
        }
    }
}
