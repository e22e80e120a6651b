//! TUI rendering and terminal management (impure shell)

pub mod board;
pub mod constants;
pub mod geometry;
pub mod scroll;

pub use board::{render_board, render_hover, render_status, BoardViewport};
pub use geometry::{FrameGeometry, SharedGeometry, TerminalColumnHandle};
pub use scroll::BoardScroll;

use crate::config::keybindings::KeyBindings;
use crate::config::EngineConfig;
use crate::model::{AppError, ColumnId, DragItem, KeyAction, RowId};
use crate::source::Card;
use crate::state::{BoardRepository, DragListener, GestureController, PointerEvent, RowVisibility};
use crate::view_state::auto_scroll::ScrollContainer;
use constants::{
    CELL_HEIGHT_UNITS, CELL_WIDTH_UNITS, FRAME_INTERVAL, IDLE_INTERVAL, STATUS_BAR_HEIGHT,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use parking_lot::RwLock;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Drag notifications turned into a status line.
#[derive(Debug, Default)]
struct StatusLine {
    message: String,
}

impl DragListener for StatusLine {
    fn on_drag_start(&mut self, column: &ColumnId, item: &DragItem) {
        self.message = format!("Dragging {} from {}", describe(item), column);
    }

    fn on_drag_end(&mut self, from: &ColumnId, to: &ColumnId, item: &DragItem) {
        self.message = if from == to {
            format!("Dropped {} in {}", describe(item), to)
        } else {
            format!("Moved {}: {} → {}", describe(item), from, to)
        };
    }

    fn on_row_press(&mut self, row: &RowId) {
        self.message = format!("Pressed {}", row);
    }

    fn on_column_changed(&mut self, _from: &ColumnId, to: &ColumnId) {
        self.message = format!("Over {}", to);
    }
}

fn describe(item: &DragItem) -> String {
    match item {
        DragItem::Row(id) => format!("card {}", id),
        DragItem::Column(id) => format!("column {}", id),
    }
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    repo: BoardRepository<Card>,
    gesture: GestureController,
    geometry: SharedGeometry,
    scroll: BoardScroll,
    key_bindings: KeyBindings,
    status: StatusLine,
    horizontal: bool,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen and mouse capture.
    pub fn new(repo: BoardRepository<Card>, config: EngineConfig) -> Result<Self, AppError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(crossterm::event::EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self::with_terminal(terminal, repo, config))
    }

    /// Run the main event loop
    ///
    /// Returns when user quits (q or Ctrl+C). Polls at frame rate while a
    /// drag or spring is running and slowly otherwise.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.tick(Instant::now())?;

        loop {
            let interval = if self.animating() {
                FRAME_INTERVAL
            } else {
                IDLE_INTERVAL
            };

            if event::poll(interval)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key, Instant::now()) {
                            return Ok(());
                        }
                    }
                    Event::Mouse(mouse) => self.handle_mouse(mouse, Instant::now()),
                    Event::Resize(width, height) => {
                        debug!("Handling resize to {}x{}", width, height);
                        self.handle_resize(Instant::now());
                    }
                    _ => {}
                }
            }

            self.tick(Instant::now())?;
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Build the app around an existing terminal. Registers one handle per
    /// column against the shared frame geometry.
    pub fn with_terminal(terminal: Terminal<B>, mut repo: BoardRepository<Card>, config: EngineConfig) -> Self {
        let geometry: SharedGeometry = Arc::new(RwLock::new(FrameGeometry::new()));
        let ids: Vec<ColumnId> = repo.get_columns().iter().map(|c| c.id().clone()).collect();
        for id in ids {
            let handle = TerminalColumnHandle::new(id.clone(), geometry.clone());
            repo.update_column_ref(id, Box::new(handle));
        }

        let horizontal = config.horizontal;
        Self {
            terminal,
            repo,
            gesture: GestureController::new(config, 0.0),
            geometry,
            scroll: BoardScroll::new(),
            key_bindings: KeyBindings::default(),
            status: StatusLine::default(),
            horizontal,
        }
    }

    /// Board being shown.
    pub fn repo(&self) -> &BoardRepository<Card> {
        &self.repo
    }

    /// Drag state machine.
    pub fn gesture(&self) -> &GestureController {
        &self.gesture
    }

    /// Terminal being drawn to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Last status message.
    pub fn status(&self) -> &str {
        &self.status.message
    }

    fn animating(&self) -> bool {
        !matches!(self.gesture.phase(), crate::state::DragPhase::Idle)
    }

    /// One frame: let the engine measure against the last drawn geometry,
    /// consume the newest sample and advance the spring, then draw and
    /// publish the new geometry.
    pub fn tick(&mut self, now: Instant) -> Result<(), AppError> {
        let reaction = self
            .gesture
            .frame(&mut self.repo, &mut self.scroll, &mut self.status, now);
        if let Some(step) = reaction.and_then(|r| r.scrolled) {
            debug!(delta = step.delta, offset = self.scroll.offset(), "Board auto-scrolled");
        }
        self.draw(now)
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        // Ctrl+C should always quit, even if not in bindings
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let step = f32::from(constants::COLUMN_WIDTH + constants::COLUMN_GAP) * CELL_WIDTH_UNITS;
        match self.key_bindings.get(key) {
            Some(KeyAction::Quit) => return true,
            Some(KeyAction::CancelDrag) => {
                self.gesture.handle_event(
                    &mut self.repo,
                    PointerEvent::Cancel,
                    &mut self.status,
                    now,
                );
            }
            Some(KeyAction::ScrollLeft) => self.scroll_manually(-step, now),
            Some(KeyAction::ScrollRight) => self.scroll_manually(step, now),
            None => {}
        }
        false
    }

    /// Terminal size changed: recorded geometry no longer matches the screen.
    pub fn handle_resize(&mut self, now: Instant) {
        self.gesture.request_measurement(&mut self.repo, now);
    }

    fn scroll_manually(&mut self, delta: f32, now: Instant) {
        self.scroll.scroll_by(delta);
        self.gesture.request_measurement(&mut self.repo, now);
    }

    /// Handle a single mouse event: left button drives the gesture.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let position = geometry::cell_to_position(mouse.column, mouse.row);
        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(item) = self.geometry.read().item_at(position) else {
                    return;
                };
                PointerEvent::Down { item, position }
            }
            MouseEventKind::Drag(MouseButton::Left) => PointerEvent::Move(position),
            MouseEventKind::Up(MouseButton::Left) => PointerEvent::Up(position),
            _ => return,
        };
        self.gesture
            .handle_event(&mut self.repo, event, &mut self.status, now);
    }

    fn hover_label(&self, item: &DragItem) -> String {
        match item {
            DragItem::Row(id) => self
                .repo
                .find_row(id, RowVisibility::IncludeHidden)
                .map(|row| row.data().title.clone())
                .unwrap_or_else(|| id.to_string()),
            DragItem::Column(id) => self
                .repo
                .column(id)
                .map(|column| column.title().to_string())
                .unwrap_or_else(|| id.to_string()),
        }
    }

    /// Render the current frame
    fn draw(&mut self, now: Instant) -> Result<(), AppError> {
        let size = self.terminal.size()?;
        let frame_area = Rect::new(0, 0, size.width, size.height);
        let board_area = Rect {
            height: frame_area.height.saturating_sub(STATUS_BAR_HEIGHT),
            ..frame_area
        };
        let status_area = Rect {
            y: board_area.bottom(),
            height: frame_area.height - board_area.height,
            ..frame_area
        };

        let (viewport_cells, unit) = if self.horizontal {
            (board_area.width, CELL_WIDTH_UNITS)
        } else {
            (board_area.height, CELL_HEIGHT_UNITS)
        };
        let content = board::content_cells(self.repo.get_columns(), self.horizontal);
        self.scroll
            .set_max(f32::from(content.saturating_sub(viewport_cells)) * unit);
        self.gesture.set_board_extent(f32::from(viewport_cells) * unit);

        let viewport = BoardViewport {
            horizontal: self.horizontal,
            offset_cells: (self.scroll.offset() / unit).round() as i32,
        };
        let hover = self
            .gesture
            .hover(now)
            .map(|h| {
                let label = self.hover_label(&h.item);
                (h, label)
            });

        let columns = self.repo.get_columns();
        let mut geometry = self.geometry.write();
        let status = &self.status.message;
        self.terminal.draw(|frame| {
            render_board(frame, board_area, columns, viewport, &mut geometry);
            if let Some((hover, label)) = &hover {
                render_hover(frame, board_area, hover, label);
            }
            render_status(frame, status_area, status);
        })?;

        Ok(())
    }
}

/// Initialize and run the TUI application
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run(repo: BoardRepository<Card>, config: EngineConfig) -> Result<(), AppError> {
    let mut app = TuiApp::new(repo, config)?;
    info!(columns = app.repo.get_columns().len(), "Starting board");

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode, mouse capture, and leaves alternate screen
fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    io::stdout().execute(crossterm::event::DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;
    use crate::source::demo_board;
    use crate::state::DragPhase;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn app(width: u16, height: u16) -> TuiApp<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let repo = BoardRepository::from_data(demo_board()).unwrap();
        TuiApp::with_terminal(terminal, repo, EngineConfig::default())
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn order(app: &TuiApp<TestBackend>, column: &str) -> Vec<String> {
        app.repo()
            .column(&ColumnId::new(column).unwrap())
            .unwrap()
            .rows()
            .iter()
            .map(|r| r.id().to_string())
            .collect()
    }

    fn screen(app: &TuiApp<TestBackend>) -> String {
        app.terminal()
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn mouse_drag_moves_card_to_other_column() {
        let mut app = app(120, 20);
        let t0 = Instant::now();
        app.tick(t0).unwrap();

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 2), t0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 10), t0);
        assert!(app.status().starts_with("Dragging card t1"));

        app.tick(t0 + Duration::from_millis(16)).unwrap();
        assert!(matches!(app.gesture().phase(), DragPhase::Dragging(_)));
        assert_eq!(order(&app, "doing"), vec!["d1", "d2", "t1"]);

        app.handle_mouse(
            mouse(MouseEventKind::Up(MouseButton::Left), 30, 10),
            t0 + Duration::from_millis(32),
        );

        assert!(matches!(app.gesture().phase(), DragPhase::Resolving { .. }));
        assert_eq!(order(&app, "todo"), vec!["t2", "t3", "t4"]);
        assert_eq!(order(&app, "doing"), vec!["d1", "d2", "t1"]);
        assert_eq!(app.status(), "Moved card t1: todo → doing");

        app.tick(t0 + Duration::from_secs(2)).unwrap();
        assert!(matches!(app.gesture().phase(), DragPhase::Idle));
        assert!(screen(&app).contains("Sketch the layout"));
    }

    #[test]
    fn click_without_movement_is_a_press() {
        let mut app = app(120, 20);
        let t0 = Instant::now();
        app.tick(t0).unwrap();

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 2), t0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 10, 2), t0);

        assert_eq!(app.status(), "Pressed t1");
        assert!(matches!(app.gesture().phase(), DragPhase::Idle));
    }

    #[test]
    fn escape_cancels_drag_without_reverting() {
        let mut app = app(120, 20);
        let t0 = Instant::now();
        app.tick(t0).unwrap();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 2), t0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 10), t0);
        app.tick(t0 + Duration::from_millis(16)).unwrap();

        assert!(!app.handle_key(key(KeyCode::Esc), t0 + Duration::from_millis(20)));

        assert!(matches!(app.gesture().phase(), DragPhase::Resolving { .. }));
        assert_eq!(order(&app, "doing"), vec!["d1", "d2", "t1"]);
        assert!(app.repo().find_row(&RowId::new("t1").unwrap(), RowVisibility::VisibleOnly).is_some());
    }

    #[test]
    fn hover_card_follows_pointer_while_dragging() {
        let mut app = app(120, 20);
        let t0 = Instant::now();
        app.tick(t0).unwrap();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 2), t0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 10), t0);
        app.tick(t0 + Duration::from_millis(16)).unwrap();

        let hover = app.gesture().hover(t0 + Duration::from_millis(16)).unwrap();
        assert_eq!(hover.item, DragItem::Row(RowId::new("t1").unwrap()));
        // Grab point (84, 40) sits (76, 24) inside the card at (8, 16).
        assert_eq!(hover.origin, Position::new(244.0 - 76.0, 168.0 - 24.0));
    }

    #[test]
    fn scroll_keys_move_board_and_quit_keys_quit() {
        let mut app = app(60, 20);
        app.tick(Instant::now()).unwrap();
        assert!(screen(&app).contains("To do"));

        assert!(!app.handle_key(key(KeyCode::Char('l')), Instant::now()));
        app.tick(Instant::now()).unwrap();
        assert!(!screen(&app).contains("To do"));
        assert!(screen(&app).contains("In progress"));

        assert!(app.handle_key(key(KeyCode::Char('q')), Instant::now()));
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), Instant::now()));
    }

    #[test]
    fn card_follows_pointer_after_manual_scroll_mid_drag() {
        let mut app = app(60, 20);
        let t0 = Instant::now();
        let at = |ms: u64| t0 + Duration::from_millis(ms);
        app.tick(t0).unwrap();

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 2), t0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 8), t0);
        app.tick(at(16)).unwrap();
        app.tick(at(300)).unwrap();
        assert!(!app.gesture().measurement_pending());

        // Review now sits under screen cell 30.
        assert!(!app.handle_key(key(KeyCode::Char('l')), at(320)));
        assert!(app.gesture().measurement_pending());

        for i in 1..=30 {
            let now = at(320 + 20 * i);
            app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 8), now);
            app.tick(now).unwrap();
        }

        assert_eq!(order(&app, "review"), vec!["v1", "t1"]);
        assert!(!order(&app, "todo").contains(&"t1".to_string()));
        assert!(app.repo().layouts().valid_count() > 0);
    }

    #[test]
    fn resize_mid_drag_schedules_remeasure() {
        let mut app = app(120, 20);
        let t0 = Instant::now();
        app.tick(t0).unwrap();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 2), t0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 8), t0);
        app.tick(t0 + Duration::from_millis(16)).unwrap();
        app.tick(t0 + Duration::from_millis(300)).unwrap();

        app.handle_resize(t0 + Duration::from_millis(320));

        assert!(app.gesture().measurement_pending());
        assert_eq!(app.repo().layouts().valid_count(), 0);
        app.tick(t0 + Duration::from_millis(340)).unwrap();
        app.tick(t0 + Duration::from_millis(440)).unwrap();
        assert!(app.repo().layouts().valid_count() > 0);
    }

    #[test]
    fn status_bar_shows_key_hints() {
        let mut app = app(100, 10);
        app.tick(Instant::now()).unwrap();
        assert!(screen(&app).contains("q quit"));
    }
}
