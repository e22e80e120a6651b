//! Board widget: columns, cards, the hover card and the status line.

use super::constants::{
    CARD_HEIGHT, CELL_HEIGHT_UNITS, CELL_WIDTH_UNITS, COLUMN_GAP, COLUMN_WIDTH,
};
use super::geometry::{cells_to_units, position_to_cell, ColumnGeometry, FrameGeometry};
use crate::model::Column;
use crate::source::Card;
use crate::state::HoverElement;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use std::collections::HashMap;
use unicode_width::UnicodeWidthChar;

/// How the board is positioned in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardViewport {
    /// Columns side by side scrolling horizontally, else scrolling vertically.
    pub horizontal: bool,
    /// Scroll offset in cells along the scroll axis.
    pub offset_cells: i32,
}

/// Length of the board content along its scroll axis, in cells.
pub fn content_cells(columns: &[Column<Card>], horizontal: bool) -> u16 {
    if horizontal {
        let n = u16::try_from(columns.len()).unwrap_or(u16::MAX);
        n.saturating_mul(COLUMN_WIDTH + COLUMN_GAP)
    } else {
        let tallest = columns.iter().map(|c| c.rows().len()).max().unwrap_or(0);
        let tallest = u16::try_from(tallest).unwrap_or(u16::MAX);
        tallest.saturating_mul(CARD_HEIGHT).saturating_add(2)
    }
}

/// Draw every column and card, recording where each landed.
pub fn render_board(
    frame: &mut Frame,
    area: Rect,
    columns: &[Column<Card>],
    viewport: BoardViewport,
    geometry: &mut FrameGeometry,
) {
    geometry.clear();
    let column_height = if viewport.horizontal {
        area.height
    } else {
        area.height.max(content_cells(columns, false))
    };

    for (i, column) in columns.iter().enumerate() {
        let board_x = i as i32 * i32::from(COLUMN_WIDTH + COLUMN_GAP);
        let (x, y) = if viewport.horizontal {
            (i32::from(area.x) + board_x - viewport.offset_cells, i32::from(area.y))
        } else {
            (i32::from(area.x) + board_x, i32::from(area.y) - viewport.offset_cells)
        };

        let mut recorded = ColumnGeometry {
            rect: cells_to_units(x, y, COLUMN_WIDTH, column_height),
            rows: HashMap::new(),
        };

        if let Some(visible) = clip(x, y, COLUMN_WIDTH, column_height, area) {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(truncate(column.title(), usize::from(COLUMN_WIDTH - 2)))
                .style(Style::default().fg(Color::White));
            frame.render_widget(block, visible);
        }

        let card_width = COLUMN_WIDTH - 2;
        for (slot, row) in column.rows().iter().enumerate() {
            let card_y = y + 1 + slot as i32 * i32::from(CARD_HEIGHT);
            recorded.rows.insert(
                row.id().clone(),
                cells_to_units(x + 1, card_y, card_width, CARD_HEIGHT),
            );

            let Some(visible) = clip(x + 1, card_y, card_width, CARD_HEIGHT, area) else {
                continue;
            };
            if row.is_hidden() {
                // Placeholder keeps the gap where the lifted card will land.
                let placeholder = Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray));
                frame.render_widget(placeholder, visible);
            } else {
                frame.render_widget(card(&row.data().title, Style::default()), visible);
            }
        }

        geometry.insert_column(column.id().clone(), recorded);
    }
}

/// Draw the floating card at the hover element's position.
pub fn render_hover(frame: &mut Frame, area: Rect, hover: &HoverElement, label: &str) {
    let (x, y) = position_to_cell(crate::model::Position::new(
        hover.origin.x + CELL_WIDTH_UNITS / 2.0,
        hover.origin.y + CELL_HEIGHT_UNITS / 2.0,
    ));
    let Some(visible) = clip(x, y, COLUMN_WIDTH - 2, CARD_HEIGHT, area) else {
        return;
    };

    let mut style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    // Terminals cannot rotate; slant the text while the card is tilted.
    if hover.rotation.abs() >= 1.0 {
        style = style.add_modifier(Modifier::ITALIC);
    }
    frame.render_widget(Clear, visible);
    frame.render_widget(card(label, style), visible);
}

/// Single-line status bar with the last drag message and key hints.
pub fn render_status(frame: &mut Frame, area: Rect, message: &str) {
    let line = Line::from(vec![
        Span::styled(" dragboard ", Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" "),
        Span::raw(message.to_string()),
        Span::styled(
            "  q quit · h/l scroll · esc cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn card<'a>(title: &str, style: Style) -> Paragraph<'a> {
    let inner = usize::from(COLUMN_WIDTH - 4);
    Paragraph::new(truncate(title, inner))
        .style(style)
        .block(Block::default().borders(Borders::ALL).border_style(style))
}

/// Intersect a cell rect that may lie partly off-screen with `bounds`.
fn clip(x: i32, y: i32, width: u16, height: u16, bounds: Rect) -> Option<Rect> {
    let left = x.max(i32::from(bounds.x));
    let top = y.max(i32::from(bounds.y));
    let right = (x + i32::from(width)).min(i32::from(bounds.right()));
    let bottom = (y + i32::from(height)).min(i32::from(bounds.bottom()));
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Cut `text` to at most `max_width` display cells, marking the cut with `…`.
pub fn truncate(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
