//! Geometry published by the last drawn frame.
//!
//! Drawing records where every column and card landed; column handles read
//! it back when the engine measures. The lock is held only for the copy.

use super::constants::{CELL_HEIGHT_UNITS, CELL_WIDTH_UNITS};
use crate::model::{ColumnId, DragItem, Position, Rect, RowId};
use crate::view_state::handles::ColumnHandle;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Frame geometry shared between the renderer and the column handles.
pub type SharedGeometry = Arc<RwLock<FrameGeometry>>;

/// One column as drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnGeometry {
    /// Column rect in board units.
    pub rect: Rect,
    /// Card rects in board units, hidden placeholders included.
    pub rows: HashMap<RowId, Rect>,
}

/// Everything drawn in one frame, in board units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameGeometry {
    columns: HashMap<ColumnId, ColumnGeometry>,
    /// Column ids in draw order.
    order: Vec<ColumnId>,
}

impl FrameGeometry {
    /// Empty geometry (nothing drawn yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a drawn column, replacing any earlier record.
    pub fn insert_column(&mut self, id: ColumnId, geometry: ColumnGeometry) {
        if !self.columns.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.columns.insert(id, geometry);
    }

    /// Geometry of one column.
    pub fn column(&self, id: &ColumnId) -> Option<&ColumnGeometry> {
        self.columns.get(id)
    }

    /// Forget everything (start of a frame).
    pub fn clear(&mut self) {
        self.columns.clear();
        self.order.clear();
    }

    /// Item a press at `position` picks up: a card, or a column by its
    /// header line.
    pub fn item_at(&self, position: Position) -> Option<DragItem> {
        for id in &self.order {
            let Some(column) = self.columns.get(id) else {
                continue;
            };
            if !column.rect.contains(position) {
                continue;
            }
            if let Some((row, _)) = column.rows.iter().find(|(_, rect)| rect.contains(position)) {
                return Some(DragItem::Row(row.clone()));
            }
            if position.y < column.rect.y + CELL_HEIGHT_UNITS {
                return Some(DragItem::Column(id.clone()));
            }
            return None;
        }
        None
    }
}

/// Convert a cell rect (possibly off-screen) into board units.
pub fn cells_to_units(x: i32, y: i32, width: u16, height: u16) -> Rect {
    Rect::new(
        x as f32 * CELL_WIDTH_UNITS,
        y as f32 * CELL_HEIGHT_UNITS,
        f32::from(width) * CELL_WIDTH_UNITS,
        f32::from(height) * CELL_HEIGHT_UNITS,
    )
}

/// Pointer cell to board units, aimed at the middle of the cell.
pub fn cell_to_position(column: u16, row: u16) -> Position {
    Position::new(
        (f32::from(column) + 0.5) * CELL_WIDTH_UNITS,
        (f32::from(row) + 0.5) * CELL_HEIGHT_UNITS,
    )
}

/// Board units back to the cell containing them.
pub fn position_to_cell(position: Position) -> (i32, i32) {
    (
        (position.x / CELL_WIDTH_UNITS).floor() as i32,
        (position.y / CELL_HEIGHT_UNITS).floor() as i32,
    )
}

/// [`ColumnHandle`] backed by the last drawn frame.
#[derive(Debug, Clone)]
pub struct TerminalColumnHandle {
    column: ColumnId,
    geometry: SharedGeometry,
}

impl TerminalColumnHandle {
    /// Handle for `column` reading from `geometry`.
    pub fn new(column: ColumnId, geometry: SharedGeometry) -> Self {
        Self { column, geometry }
    }
}

impl ColumnHandle for TerminalColumnHandle {
    fn measure(&self) -> Option<Rect> {
        self.geometry.read().column(&self.column).map(|c| c.rect)
    }

    fn measure_row(&self, row: &RowId) -> Option<Rect> {
        self.geometry
            .read()
            .column(&self.column)
            .and_then(|c| c.rows.get(row).copied())
    }
}
