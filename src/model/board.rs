//! Columns, rows and the raw board data they are built from.

use super::identifiers::{ColumnId, RowId};
use serde::Deserialize;

/// A card on the board.
///
/// Owned by exactly one column at a time; `column_id` is a back-reference
/// kept in sync by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    id: RowId,
    column_id: ColumnId,
    index: usize,
    data: T,
    hidden: bool,
}

impl<T> Row<T> {
    pub(crate) fn new(id: RowId, column_id: ColumnId, index: usize, data: T) -> Self {
        Self {
            id,
            column_id,
            index,
            data,
            hidden: false,
        }
    }

    /// Row identifier.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// Column currently holding this row.
    pub fn column_id(&self) -> &ColumnId {
        &self.column_id
    }

    /// Ordinal within the owning column (hidden rows included).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Caller-owned payload.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Whether the row is currently lifted out as a hover element.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn set_placement(&mut self, column_id: ColumnId, index: usize) {
        self.column_id = column_id;
        self.index = index;
    }
}

/// One column of the board and its ordered rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    id: ColumnId,
    title: Option<String>,
    index: usize,
    rows: Vec<Row<T>>,
}

impl<T> Column<T> {
    pub(crate) fn new(id: ColumnId, title: Option<String>, index: usize) -> Self {
        Self {
            id,
            title,
            index,
            rows: Vec::new(),
        }
    }

    /// Column identifier.
    pub fn id(&self) -> &ColumnId {
        &self.id
    }

    /// Display title, falling back to the identifier.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_else(|| self.id.as_str())
    }

    /// Ordinal among columns.
    pub fn index(&self) -> usize {
        self.index
    }

    /// All rows, hidden ones included.
    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    /// Rows taking part in rendering and hit-testing.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row<T>> {
        self.rows.iter().filter(|row| !row.hidden)
    }

    /// Position of a row in [`Column::rows`].
    pub fn position_of(&self, row: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| &r.id == row)
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row<T>> {
        &mut self.rows
    }

    pub(crate) fn remove_row(&mut self, position: usize) -> Row<T> {
        let row = self.rows.remove(position);
        self.renumber();
        row
    }

    pub(crate) fn insert_row(&mut self, position: usize, mut row: Row<T>) {
        let position = position.min(self.rows.len());
        row.column_id = self.id.clone();
        self.rows.insert(position, row);
        self.renumber();
    }

    /// Re-establish `row.index == position` and `row.column_id == self.id`.
    pub(crate) fn renumber(&mut self) {
        for (position, row) in self.rows.iter_mut().enumerate() {
            row.set_placement(self.id.clone(), position);
        }
    }
}

/// The thing being dragged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DragItem {
    /// A single row.
    Row(RowId),
    /// A whole column.
    Column(ColumnId),
}

/// Serialized board used to seed a repository.
///
/// ```json
/// { "columns": [ { "id": "todo", "title": "To do",
///                  "rows": [ { "id": "r1", "data": { "title": "Write" } } ] } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct BoardData<T> {
    /// Columns in display order.
    pub columns: Vec<ColumnData<T>>,
}

/// Serialized column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ColumnData<T> {
    /// Column identifier.
    pub id: ColumnId,
    /// Optional display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Rows in display order.
    #[serde(default = "Vec::new")]
    pub rows: Vec<RowData<T>>,
}

/// Serialized row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RowData<T> {
    /// Row identifier.
    pub id: RowId,
    /// Caller-owned payload.
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_with(ids: &[&str]) -> Column<()> {
        let col_id = ColumnId::new("A").unwrap();
        let mut column = Column::new(col_id.clone(), None, 0);
        for (i, id) in ids.iter().enumerate() {
            column
                .rows_mut()
                .push(Row::new(RowId::new(*id).unwrap(), col_id.clone(), i, ()));
        }
        column
    }

    #[test]
    fn title_falls_back_to_id() {
        let column: Column<()> = Column::new(ColumnId::new("todo").unwrap(), None, 0);
        assert_eq!(column.title(), "todo");
    }

    #[test]
    fn visible_rows_skip_hidden() {
        let mut column = column_with(&["r1", "r2", "r3"]);
        column.rows_mut()[1].set_hidden(true);

        let visible: Vec<_> = column.visible_rows().map(|r| r.id().as_str()).collect();
        assert_eq!(visible, vec!["r1", "r3"]);
    }

    #[test]
    fn insert_and_remove_renumber() {
        let mut column = column_with(&["r1", "r2", "r3"]);
        let row = column.remove_row(0);
        assert_eq!(column.rows()[0].index(), 0);
        assert_eq!(column.rows()[1].index(), 1);

        column.insert_row(2, row);
        let order: Vec<_> = column
            .rows()
            .iter()
            .map(|r| (r.id().as_str(), r.index()))
            .collect();
        assert_eq!(order, vec![("r2", 0), ("r3", 1), ("r1", 2)]);
    }

    #[test]
    fn insert_clamps_past_end() {
        let mut column = column_with(&["r1"]);
        let other = Row::new(
            RowId::new("x").unwrap(),
            ColumnId::new("B").unwrap(),
            7,
            (),
        );
        column.insert_row(99, other);
        assert_eq!(column.rows()[1].index(), 1);
        assert_eq!(column.rows()[1].column_id().as_str(), "A");
    }

    #[test]
    fn board_data_parses_json() {
        let json = r#"{ "columns": [
            { "id": "A", "rows": [ { "id": "r1", "data": 1 } ] },
            { "id": "B", "title": "Done" }
        ] }"#;
        let data: BoardData<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(data.columns.len(), 2);
        assert_eq!(data.columns[0].rows[0].data, 1);
        assert_eq!(data.columns[1].title.as_deref(), Some("Done"));
        assert!(data.columns[1].rows.is_empty());
    }
}
