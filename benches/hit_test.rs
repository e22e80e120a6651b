//! Hit-test and reorder benchmarks for large boards.
//!
//! A drag sample must be handled well within one frame. These benchmarks
//! run `move_row` over boards with many columns and rows, alternating
//! between two columns so every iteration moves the row.
//!
//! Run with: cargo bench --bench hit_test

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dragboard::model::{BoardData, ColumnData, ColumnId, DragItem, Position, Rect, RowData, RowId};
use dragboard::state::{BoardRepository, DragSession};
use dragboard::view_state::{hit_test, StaticColumnHandle};

const COLUMN_WIDTH: f32 = 200.0;
const ROW_HEIGHT: f32 = 40.0;

/// `columns` columns of `rows` rows each, measured.
fn make_board(columns: usize, rows: usize) -> BoardRepository<()> {
    let data = BoardData {
        columns: (0..columns)
            .map(|c| ColumnData {
                id: ColumnId::new(format!("c{c}")).expect("valid column id"),
                title: None,
                rows: (0..rows)
                    .map(|r| RowData {
                        id: RowId::new(format!("c{c}r{r}")).expect("valid row id"),
                        data: (),
                    })
                    .collect(),
            })
            .collect(),
    };
    let mut repo = BoardRepository::from_data(data).expect("valid board");

    for c in 0..columns {
        let x = c as f32 * COLUMN_WIDTH;
        let mut handle = StaticColumnHandle::new(Rect::new(
            x,
            0.0,
            COLUMN_WIDTH,
            (rows + 1) as f32 * ROW_HEIGHT,
        ));
        for r in 0..rows {
            handle = handle.with_row(
                RowId::new(format!("c{c}r{r}")).expect("valid row id"),
                Rect::new(x, r as f32 * ROW_HEIGHT, COLUMN_WIDTH, ROW_HEIGHT),
            );
        }
        repo.update_column_ref(
            ColumnId::new(format!("c{c}")).expect("valid column id"),
            Box::new(handle),
        );
    }
    repo.measure_columns_layout();
    repo
}

fn bench_move_row(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_row");

    for (columns, rows) in [(5, 20), (20, 100), (50, 1_000)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{columns}x{rows}")),
            &(columns, rows),
            |b, &(columns, rows)| {
                let mut repo = make_board(columns, rows);
                let dragged = RowId::new("c0r0").expect("valid row id");
                let origin = ColumnId::new("c0").expect("valid column id");
                let mut session = DragSession::new(DragItem::Row(dragged.clone()), origin);
                repo.hide_row(&dragged);

                // Middle of the last column and the middle of the first.
                let far = Position::new(
                    (columns as f32 - 0.5) * COLUMN_WIDTH,
                    (rows as f32 / 2.0) * ROW_HEIGHT + 5.0,
                );
                let near = Position::new(COLUMN_WIDTH / 2.0, far.y);
                let mut flip = false;

                b.iter(|| {
                    flip = !flip;
                    let target = if flip { far } else { near };
                    black_box(repo.move_row(&mut session, black_box(target), |_, _| {}))
                });
            },
        );
    }

    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");

    for (columns, rows) in [(5, 20), (50, 1_000)] {
        let repo = make_board(columns, rows);
        let last_row = Position::new(
            (columns as f32 - 0.5) * COLUMN_WIDTH,
            (rows as f32 - 0.5) * ROW_HEIGHT,
        );

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{columns}x{rows}")),
            &last_row,
            |b, &position| {
                b.iter(|| {
                    black_box(hit_test(
                        repo.get_columns(),
                        repo.layouts(),
                        black_box(position),
                        None,
                    ))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_move_row, bench_hit_test);
criterion_main!(benches);
