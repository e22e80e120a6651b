//! Drag gesture state machine.
//!
//! ```text
//! Idle ──down──▶ Pressed ──move > slop──▶ Measuring ──frame──▶ Dragging
//!   ▲               │ up (on_row_press)        │ up/cancel        │ up/cancel
//!   │               ▼                          ▼                  ▼
//!   └──────────── Idle ◀──spring finished── Resolving ◀───────────┘
//! ```
//!
//! Pointer input is split in two: [`GestureController::handle_event`] is
//! cheap and may run at pointer rate, publishing into the single-slot
//! [`PositionSlot`]; [`GestureController::frame`] runs once per render on
//! the context that owns the board and consumes only the newest sample.

use super::board_repository::{BoardRepository, RowVisibility};
use super::reactor::{PositionReactor, PositionSlot, Reaction};
use super::session::DragSession;
use crate::config::EngineConfig;
use crate::model::{ColumnId, DragItem, Position, Rect, RowId};
use crate::view_state::auto_scroll::{AutoScrollController, ScrollContainer};
use crate::view_state::debounce::MeasureDebouncer;
use crate::view_state::spring::SpringReturn;
use std::time::Instant;
use tracing::{debug, info, trace};

/// Drag notifications for the embedding application.
///
/// Every method has a no-op default; implement the ones you need.
pub trait DragListener {
    /// A drag left `Pressed` and the item was lifted.
    fn on_drag_start(&mut self, _column: &ColumnId, _item: &DragItem) {}

    /// A drag finished. Fires exactly once per drag; `from == to` when the
    /// item stayed in its column.
    fn on_drag_end(&mut self, _from: &ColumnId, _to: &ColumnId, _item: &DragItem) {}

    /// Pointer went down and up on a row without moving past the slop.
    fn on_row_press(&mut self, _row: &RowId) {}

    /// The dragged row entered another column.
    fn on_column_changed(&mut self, _from: &ColumnId, _to: &ColumnId) {}
}

impl DragListener for () {}

/// Raw pointer input.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed on a draggable item.
    Down {
        /// Item under the pointer.
        item: DragItem,
        /// Press location.
        position: Position,
    },
    /// Pointer moved while pressed.
    Move(Position),
    /// Pointer released.
    Up(Position),
    /// Gesture aborted by the platform or the user.
    Cancel,
}

/// Where the controller is in the drag lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum DragPhase {
    /// No gesture.
    Idle,
    /// Pointer is down but has not travelled past the slop.
    Pressed {
        /// Pressed item.
        item: DragItem,
        /// Column the item lives in.
        origin: ColumnId,
        /// Press location.
        press: Position,
    },
    /// Item lifted; waiting for a fresh measurement before showing it.
    Measuring {
        /// The drag.
        session: DragSession,
        /// Press location, for the grab offset.
        press: Position,
    },
    /// Samples drive the board.
    Dragging(DragSession),
    /// Drop committed; the hover element springs back to rest.
    Resolving {
        /// Item that was dropped.
        item: DragItem,
        /// Where the item rests after the drop.
        resting: Position,
        /// Tween from the drop offset to rest.
        spring: SpringReturn,
    },
}

/// The floating proxy drawn above the board.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverElement {
    /// Item being shown.
    pub item: DragItem,
    /// Top-left corner.
    pub origin: Position,
    /// Tilt in degrees.
    pub rotation: f32,
}

/// Owns the drag lifecycle for one board.
#[derive(Debug)]
pub struct GestureController {
    config: EngineConfig,
    phase: DragPhase,
    reactor: PositionReactor,
    slot: PositionSlot,
    pointer: Position,
    grab_offset: Position,
}

impl GestureController {
    /// Idle controller for a board `extent` units long on its scroll axis.
    pub fn new(config: EngineConfig, extent: f32) -> Self {
        let reactor = PositionReactor::new(
            AutoScrollController::new(config.auto_scroll(), extent),
            MeasureDebouncer::new(config.measure_debounce),
        );
        let slot = PositionSlot::new();
        slot.close();
        Self {
            config,
            phase: DragPhase::Idle,
            reactor,
            slot,
            pointer: Position::default(),
            grab_offset: Position::default(),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// The active drag, in `Measuring` or `Dragging`.
    pub fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            DragPhase::Measuring { session, .. } | DragPhase::Dragging(session) => Some(session),
            _ => None,
        }
    }

    /// Whether a drag owns the pointer.
    pub fn is_active(&self) -> bool {
        self.session().is_some()
    }

    /// Handle for publishing samples from another thread. Publishes are
    /// refused outside a drag.
    pub fn position_slot(&self) -> PositionSlot {
        self.slot.clone()
    }

    /// Board length changed (resize).
    pub fn set_board_extent(&mut self, extent: f32) {
        self.reactor.auto_scroll_mut().set_extent(extent);
    }

    /// The presentation layer moved things under the engine (resize,
    /// manual scroll). Every recorded rect goes stale; during a drag a
    /// debounced re-measure picks up the new geometry.
    pub fn request_measurement<T: Clone>(&mut self, repo: &mut BoardRepository<T>, now: Instant) {
        repo.invalidate_layouts();
        if self.is_active() {
            trace!("Re-measure requested by layout change");
            self.reactor.request_measurement(now);
        }
    }

    /// A debounced re-measure is waiting for its quiet window.
    pub fn measurement_pending(&self) -> bool {
        self.reactor.measurement_pending()
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feed one pointer event.
    pub fn handle_event<T: Clone>(
        &mut self,
        repo: &mut BoardRepository<T>,
        event: PointerEvent,
        listener: &mut dyn DragListener,
        now: Instant,
    ) {
        match event {
            PointerEvent::Down { item, position } => self.pointer_down(repo, item, position),
            PointerEvent::Move(position) => self.pointer_move(repo, position, listener),
            PointerEvent::Up(position) => self.pointer_up(repo, position, listener, now),
            PointerEvent::Cancel => self.cancel(repo, listener, now),
        }
    }

    /// Per-frame work on the board-owning context: finish measurement,
    /// react to the newest sample, run the debounced re-measure and retire
    /// a finished spring.
    pub fn frame<T: Clone>(
        &mut self,
        repo: &mut BoardRepository<T>,
        scroller: &mut dyn ScrollContainer,
        listener: &mut dyn DragListener,
        now: Instant,
    ) -> Option<Reaction> {
        if matches!(self.phase, DragPhase::Measuring { .. }) {
            self.complete_measurement(repo);
        }

        match &mut self.phase {
            DragPhase::Dragging(session) => {
                let reaction = self
                    .slot
                    .take()
                    .map(|sample| self.reactor.react(repo, session, sample, scroller, now));
                if let Some((from, to)) = reaction.as_ref().and_then(|r| r.column_changed.as_ref()) {
                    listener.on_column_changed(from, to);
                }
                self.reactor.poll_measurement(repo, now);
                reaction
            }
            DragPhase::Resolving { spring, .. } => {
                if spring.is_finished(now) {
                    trace!("Spring settled");
                    self.phase = DragPhase::Idle;
                }
                None
            }
            _ => None,
        }
    }

    /// Floating element to draw, if any. Hidden while measuring so it never
    /// flashes at stale coordinates.
    pub fn hover(&self, now: Instant) -> Option<HoverElement> {
        match &self.phase {
            DragPhase::Dragging(session) => Some(HoverElement {
                item: session.item().clone(),
                origin: self.hover_origin(),
                rotation: self.config.active_row_rotation,
            }),
            DragPhase::Resolving {
                item,
                resting,
                spring,
            } if !spring.is_finished(now) => {
                let offset = spring.offset_at(now);
                Some(HoverElement {
                    item: item.clone(),
                    origin: Position::new(resting.x + offset.x, resting.y + offset.y),
                    rotation: self.config.active_row_rotation * spring.remaining(now),
                })
            }
            _ => None,
        }
    }

    /// Drop everything synchronously: no drag-end, no commit. For unmount
    /// and board replacement.
    pub fn teardown<T: Clone>(&mut self, repo: &mut BoardRepository<T>) {
        self.slot.close();
        self.reactor.cancel_measurement();
        let previous = std::mem::replace(&mut self.phase, DragPhase::Idle);
        let item = match previous {
            DragPhase::Measuring { session, .. } | DragPhase::Dragging(session) => {
                Some(session.item().clone())
            }
            _ => None,
        };
        if let Some(DragItem::Row(row)) = &item {
            repo.show_row(row);
        }
        repo.invalidate_layouts();
        self.grab_offset = Position::default();
        debug!(had_session = item.is_some(), "Gesture torn down");
    }

    fn pointer_down<T: Clone>(
        &mut self,
        repo: &mut BoardRepository<T>,
        item: DragItem,
        position: Position,
    ) {
        match &mut self.phase {
            DragPhase::Idle => {}
            DragPhase::Resolving { spring, .. } => {
                spring.cancel();
                self.phase = DragPhase::Idle;
            }
            _ => {
                trace!("Pointer down during an active gesture ignored");
                return;
            }
        }

        let origin = match &item {
            DragItem::Row(id) => repo
                .find_row(id, RowVisibility::VisibleOnly)
                .map(|row| row.column_id().clone()),
            DragItem::Column(id) => repo.column(id).map(|column| column.id().clone()),
        };
        let Some(origin) = origin else {
            debug!(?item, "Press on unknown or hidden item");
            return;
        };

        self.pointer = position;
        self.phase = DragPhase::Pressed {
            item,
            origin,
            press: position,
        };
    }

    fn pointer_move<T: Clone>(
        &mut self,
        repo: &mut BoardRepository<T>,
        position: Position,
        listener: &mut dyn DragListener,
    ) {
        self.pointer = position;
        match &self.phase {
            DragPhase::Pressed { press, .. } => {
                let dx = position.x - press.x;
                let dy = position.y - press.y;
                if dx.hypot(dy) > self.config.drag_slop {
                    self.begin_drag(repo, listener);
                }
            }
            DragPhase::Measuring { .. } | DragPhase::Dragging(_) => {
                self.slot.publish(position);
            }
            _ => {}
        }
    }

    fn begin_drag<T: Clone>(&mut self, repo: &mut BoardRepository<T>, listener: &mut dyn DragListener) {
        let DragPhase::Pressed {
            item,
            origin,
            press,
        } = std::mem::replace(&mut self.phase, DragPhase::Idle)
        else {
            return;
        };

        if let DragItem::Row(row) = &item {
            repo.hide_row(row);
        }
        self.slot.reopen();
        info!(column = %origin, ?item, "Drag started");
        listener.on_drag_start(&origin, &item);

        self.phase = DragPhase::Measuring {
            session: DragSession::new(item, origin),
            press,
        };
        self.slot.publish(self.pointer);
    }

    fn complete_measurement<T: Clone>(&mut self, repo: &mut BoardRepository<T>) {
        let DragPhase::Measuring { session, press } =
            std::mem::replace(&mut self.phase, DragPhase::Idle)
        else {
            return;
        };

        let measured = repo.measure_columns_layout();
        self.grab_offset = item_rect(repo, session.item())
            .map(|rect| Position::new(press.x - rect.x, press.y - rect.y))
            .unwrap_or_default();
        debug!(measured, "Measurement complete, dragging");
        self.phase = DragPhase::Dragging(session);
    }

    fn pointer_up<T: Clone>(
        &mut self,
        repo: &mut BoardRepository<T>,
        position: Position,
        listener: &mut dyn DragListener,
        now: Instant,
    ) {
        self.pointer = position;
        match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Pressed { item, .. } => {
                if let DragItem::Row(row) = &item {
                    debug!(row = %row, "Row pressed");
                    listener.on_row_press(row);
                }
            }
            DragPhase::Measuring { session, .. } => {
                self.resolve(repo, session, listener, now, None);
            }
            DragPhase::Dragging(mut session) => {
                // The release point supersedes any unconsumed sample.
                self.slot.take();
                if session.dragged_row().is_some() {
                    repo.move_row(&mut session, position, |from, to| {
                        listener.on_column_changed(from, to);
                    });
                } else {
                    repo.move_column(&session, position);
                }
                let drop = self.hover_origin();
                self.resolve(repo, session, listener, now, Some(drop));
            }
            other => self.phase = other,
        }
    }

    fn cancel<T: Clone>(
        &mut self,
        repo: &mut BoardRepository<T>,
        listener: &mut dyn DragListener,
        now: Instant,
    ) {
        match std::mem::replace(&mut self.phase, DragPhase::Idle) {
            DragPhase::Pressed { .. } | DragPhase::Idle => {}
            DragPhase::Measuring { session, .. } => {
                self.resolve(repo, session, listener, now, None);
            }
            DragPhase::Dragging(session) => {
                let drop = self.hover_origin();
                self.resolve(repo, session, listener, now, Some(drop));
            }
            resolving @ DragPhase::Resolving { .. } => self.phase = resolving,
        }
    }

    /// Finish a drag where the last successful hit-test left it.
    fn resolve<T: Clone>(
        &mut self,
        repo: &mut BoardRepository<T>,
        session: DragSession,
        listener: &mut dyn DragListener,
        now: Instant,
        drop: Option<Position>,
    ) {
        self.slot.close();
        self.reactor.cancel_measurement();

        if let Some(row) = session.dragged_row() {
            repo.show_row(row);
        }
        info!(
            from = %session.origin_column(),
            to = %session.current_column(),
            item = ?session.item(),
            "Drag ended"
        );
        listener.on_drag_end(session.origin_column(), session.current_column(), session.item());
        repo.update_original_data();

        repo.update_column_layout(session.current_column());
        let resting = item_rect(repo, session.item()).map(|rect| Position::new(rect.x, rect.y));
        let (resting, from) = match (resting, drop) {
            (Some(resting), Some(drop)) => (resting, Position::new(drop.x - resting.x, drop.y - resting.y)),
            (Some(resting), None) => (resting, Position::default()),
            (None, drop) => (drop.unwrap_or_default(), Position::default()),
        };

        self.grab_offset = Position::default();
        self.phase = DragPhase::Resolving {
            item: session.item().clone(),
            resting,
            spring: SpringReturn::new(from, now, self.config.spring_duration),
        };
    }

    fn hover_origin(&self) -> Position {
        Position::new(
            self.pointer.x - self.grab_offset.x,
            self.pointer.y - self.grab_offset.y,
        )
    }
}

fn item_rect<T: Clone>(repo: &BoardRepository<T>, item: &DragItem) -> Option<Rect> {
    match item {
        DragItem::Row(id) => repo.layouts().row_layout(id),
        DragItem::Column(id) => repo.layouts().column_layout(id),
    }
}

// ===== Tests =====

#[cfg(test)]
#[path = "gesture_tests.rs"]
mod tests;
