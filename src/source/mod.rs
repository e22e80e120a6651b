//! Board input sources.
//!
//! A board file is a JSON document:
//!
//! ```json
//! { "columns": [ { "id": "todo", "title": "To do",
//!                  "rows": [ { "id": "t1", "data": { "title": "Write docs" } } ] } ] }
//! ```
//!
//! Without a file the binary starts from [`demo_board`].

use crate::model::error::LoadError;
use crate::model::{BoardData, ColumnData, ColumnId, RowData, RowId};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Payload of one card on the terminal board.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Card {
    /// Headline shown on the card.
    pub title: String,
    /// Secondary text, may be empty.
    #[serde(default)]
    pub description: String,
}

impl Card {
    /// Card with a title and no description.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
        }
    }
}

/// Read a board file.
///
/// # Errors
///
/// `FileNotFound` when the path does not exist, `Json` when it does not
/// decode, `Io` for other read failures.
pub fn load_board(path: &Path) -> Result<BoardData<Card>, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path)?;
    let board = parse_board(&contents).map_err(|reason| LoadError::Json {
        path: path.to_path_buf(),
        reason,
    })?;

    info!(path = %path.display(), columns = board.columns.len(), "Loaded board");
    Ok(board)
}

/// Decode board JSON. The error is the decoder's message.
pub fn parse_board(json: &str) -> Result<BoardData<Card>, String> {
    serde_json::from_str(json).map_err(|e| e.to_string())
}

/// Sample board used when no file is given.
pub fn demo_board() -> BoardData<Card> {
    let columns = [
        (
            "todo",
            "To do",
            &[
                ("t1", "Sketch the layout"),
                ("t2", "Pick a palette"),
                ("t3", "Write the README"),
                ("t4", "Collect feedback"),
            ][..],
        ),
        (
            "doing",
            "In progress",
            &[("d1", "Drag engine"), ("d2", "Auto-scroll")][..],
        ),
        ("review", "Review", &[("v1", "Spring return")][..]),
        ("done", "Done", &[("x1", "Hit testing"), ("x2", "Layout store")][..]),
        ("later", "Later", &[][..]),
    ];

    BoardData {
        columns: columns
            .iter()
            .filter_map(|(id, title, rows)| {
                Some(ColumnData {
                    id: ColumnId::new(*id).ok()?,
                    title: Some((*title).to_string()),
                    rows: rows
                        .iter()
                        .filter_map(|(row, card)| {
                            Some(RowData {
                                id: RowId::new(*row).ok()?,
                                data: Card::new(*card),
                            })
                        })
                        .collect(),
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::BoardRepository;
    use std::fs;

    #[test]
    fn parse_board_reads_columns_rows_and_cards() {
        let json = r#"{"columns":[
            {"id":"A","title":"Alpha","rows":[{"id":"r1","data":{"title":"One","description":"first"}}]},
            {"id":"B"}
        ]}"#;

        let board = parse_board(json).unwrap();

        assert_eq!(board.columns.len(), 2);
        assert_eq!(board.columns[0].title.as_deref(), Some("Alpha"));
        assert_eq!(board.columns[0].rows[0].id.as_str(), "r1");
        assert_eq!(board.columns[0].rows[0].data.description, "first");
        assert!(board.columns[1].rows.is_empty());
        assert_eq!(board.columns[1].title, None);
    }

    #[test]
    fn parse_board_rejects_empty_ids() {
        let json = r#"{"columns":[{"id":"","rows":[]}]}"#;
        assert!(parse_board(json).is_err());
    }

    #[test]
    fn load_board_reports_missing_file() {
        let path = std::env::temp_dir().join("dragboard_missing_board_12345.json");
        assert!(matches!(
            load_board(&path),
            Err(LoadError::FileNotFound { .. })
        ));
    }

    #[test]
    fn load_board_reports_bad_json_with_path() {
        let path = std::env::temp_dir().join("dragboard_bad_board.json");
        fs::write(&path, "{ not json").unwrap();

        let result = load_board(&path);
        let _ = fs::remove_file(&path);

        match result {
            Err(LoadError::Json { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected Json error, got {:?}", other),
        }
    }

    #[test]
    fn demo_board_is_a_valid_board() {
        let repo = BoardRepository::from_data(demo_board()).unwrap();
        assert_eq!(repo.get_columns().len(), 5);
        assert!(repo.get_columns().last().unwrap().rows().is_empty());
    }
}
