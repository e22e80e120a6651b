//! Position sampling: the single-slot channel and the reactor that applies
//! samples to the board.
//!
//! Pointer input may arrive far faster than the board can be re-rendered.
//! Only the newest sample matters, so the channel between the pointer
//! context and the board-owning context holds exactly one value and every
//! publish overwrites it. Nothing ever queues.

use super::board_repository::BoardRepository;
use super::session::DragSession;
use crate::model::{ColumnId, DragItem, Position};
use crate::view_state::auto_scroll::{AutoScrollController, ScrollContainer, ScrollStep};
use crate::view_state::debounce::MeasureDebouncer;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug, Default)]
struct SlotState {
    latest: Option<Position>,
    closed: bool,
    overwritten: u64,
}

#[derive(Debug, Default)]
struct SlotInner {
    state: Mutex<SlotState>,
    ready: Condvar,
}

/// Latest-wins channel for pointer samples. Cheap to clone; all clones
/// share the same slot.
#[derive(Debug, Clone, Default)]
pub struct PositionSlot {
    inner: Arc<SlotInner>,
}

impl PositionSlot {
    /// Open, empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `position`, replacing any unconsumed sample. Returns `false`
    /// once the slot is closed.
    pub fn publish(&self, position: Position) -> bool {
        let mut state = self.inner.state.lock();
        if state.closed {
            return false;
        }
        if state.latest.replace(position).is_some() {
            state.overwritten += 1;
        }
        drop(state);
        self.inner.ready.notify_one();
        true
    }

    /// Take the newest sample without blocking.
    pub fn take(&self) -> Option<Position> {
        self.inner.state.lock().latest.take()
    }

    /// Block until a sample arrives, the slot closes, or `timeout` elapses.
    pub fn wait_take(&self, timeout: Duration) -> Option<Position> {
        let mut state = self.inner.state.lock();
        if state.latest.is_none() && !state.closed {
            self.inner.ready.wait_for(&mut state, timeout);
        }
        state.latest.take()
    }

    /// Drop any pending sample and refuse further publishes.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        state.closed = true;
        state.latest = None;
        drop(state);
        self.inner.ready.notify_all();
    }

    /// Accept samples again (next drag).
    pub fn reopen(&self) {
        let mut state = self.inner.state.lock();
        state.closed = false;
        state.latest = None;
    }

    /// Whether publishes are refused.
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// Samples that were replaced before anyone consumed them.
    pub fn overwritten(&self) -> u64 {
        self.inner.state.lock().overwritten
    }
}

/// Outcome of reacting to one sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reaction {
    /// Column under the pointer, if any.
    pub column: Option<ColumnId>,
    /// `(previous, new)` when the dragged row changed column.
    pub column_changed: Option<(ColumnId, ColumnId)>,
    /// Scroll issued for this sample.
    pub scrolled: Option<ScrollStep>,
}

/// Applies position samples: hit-test and reorder through the repository,
/// then auto-scroll and schedule re-measurement.
#[derive(Debug, Clone)]
pub struct PositionReactor {
    auto_scroll: AutoScrollController,
    debouncer: MeasureDebouncer,
}

impl PositionReactor {
    /// Reactor with the given auto-scroll policy and measurement debounce.
    pub fn new(auto_scroll: AutoScrollController, debouncer: MeasureDebouncer) -> Self {
        Self {
            auto_scroll,
            debouncer,
        }
    }

    /// Auto-scroll policy.
    pub fn auto_scroll(&self) -> &AutoScrollController {
        &self.auto_scroll
    }

    /// Auto-scroll policy, for extent updates.
    pub fn auto_scroll_mut(&mut self) -> &mut AutoScrollController {
        &mut self.auto_scroll
    }

    /// React to one sample.
    pub fn react<T: Clone>(
        &mut self,
        repo: &mut BoardRepository<T>,
        session: &mut DragSession,
        position: Position,
        scroller: &mut dyn ScrollContainer,
        now: Instant,
    ) -> Reaction {
        let mut column_changed = None;
        let before = placement(repo, session.item());
        let column = if matches!(session.item(), DragItem::Row(_)) {
            repo.move_row(session, position, |from, to| {
                column_changed = Some((from.clone(), to.clone()));
            })
        } else {
            repo.move_column(session, position)
        };
        if placement(repo, session.item()) != before {
            // Neighbours shifted; their recorded rects are out of date.
            self.debouncer.request(now);
        }

        // Layouts are stale for the whole scroll burst, so a miss while a
        // re-measurement is pending still counts as over the board.
        let relevant = column.is_some() || self.debouncer.is_pending();
        let scrolled = self.auto_scroll.on_sample(position, relevant);
        if let Some(step) = scrolled {
            trace!(delta = step.delta, "Auto-scroll step");
            scroller.scroll_by(step.delta);
            repo.invalidate_layouts();
            self.debouncer.request(now);
        }

        Reaction {
            column,
            column_changed,
            scrolled,
        }
    }

    /// Run the debounced re-measurement if its quiet window has passed.
    /// Returns whether a measurement ran.
    pub fn poll_measurement<T: Clone>(&mut self, repo: &mut BoardRepository<T>, now: Instant) -> bool {
        if self.debouncer.poll(now) {
            repo.measure_columns_layout();
            return true;
        }
        false
    }

    /// Schedule a debounced re-measurement, restarting the quiet window.
    pub fn request_measurement(&mut self, now: Instant) {
        self.debouncer.request(now);
    }

    /// A re-measurement is scheduled.
    pub fn measurement_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Forget any scheduled re-measurement.
    pub fn cancel_measurement(&mut self) {
        self.debouncer.cancel();
    }
}

/// Where the dragged item currently sits: `(column, row)` for rows,
/// `(column, 0)` for columns.
fn placement<T: Clone>(repo: &BoardRepository<T>, item: &DragItem) -> Option<(usize, usize)> {
    match item {
        DragItem::Row(id) => repo.locate_row(id),
        DragItem::Column(id) => repo
            .get_columns()
            .iter()
            .position(|c| c.id() == id)
            .map(|index| (index, 0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoardData, ColumnData, Rect, RowData, RowId};
    use crate::view_state::auto_scroll::AutoScrollConfig;
    use crate::view_state::handles::StaticColumnHandle;
    use std::thread;

    #[derive(Default)]
    struct RecordingScroller {
        deltas: Vec<f32>,
    }

    impl ScrollContainer for RecordingScroller {
        fn scroll_by(&mut self, delta: f32) {
            self.deltas.push(delta);
        }
    }

    fn col(id: &str) -> ColumnId {
        ColumnId::new(id).unwrap()
    }

    fn row(id: &str) -> RowId {
        RowId::new(id).unwrap()
    }

    fn board() -> BoardRepository<()> {
        let data = BoardData {
            columns: vec![
                ColumnData {
                    id: col("A"),
                    title: None,
                    rows: vec![RowData { id: row("r1"), data: () }],
                },
                ColumnData {
                    id: col("B"),
                    title: None,
                    rows: vec![],
                },
            ],
        };
        let mut repo = BoardRepository::from_data(data).unwrap();
        repo.update_column_ref(
            col("A"),
            Box::new(
                StaticColumnHandle::new(Rect::new(0.0, 0.0, 200.0, 400.0))
                    .with_row(row("r1"), Rect::new(0.0, 10.0, 200.0, 10.0)),
            ),
        );
        repo.update_column_ref(
            col("B"),
            Box::new(StaticColumnHandle::new(Rect::new(200.0, 0.0, 200.0, 400.0))),
        );
        repo.measure_columns_layout();
        repo
    }

    fn reactor() -> PositionReactor {
        PositionReactor::new(
            AutoScrollController::new(AutoScrollConfig::default(), 400.0),
            MeasureDebouncer::new(Duration::from_millis(100)),
        )
    }

    #[test]
    fn slot_keeps_only_latest_sample() {
        let slot = PositionSlot::new();
        slot.publish(Position::new(1.0, 1.0));
        slot.publish(Position::new(2.0, 2.0));
        slot.publish(Position::new(3.0, 3.0));

        assert_eq!(slot.take(), Some(Position::new(3.0, 3.0)));
        assert_eq!(slot.take(), None);
        assert_eq!(slot.overwritten(), 2);
    }

    #[test]
    fn closed_slot_refuses_samples() {
        let slot = PositionSlot::new();
        slot.publish(Position::new(1.0, 1.0));
        slot.close();

        assert!(!slot.publish(Position::new(2.0, 2.0)));
        assert_eq!(slot.take(), None);

        slot.reopen();
        assert!(slot.publish(Position::new(3.0, 3.0)));
        assert_eq!(slot.take(), Some(Position::new(3.0, 3.0)));
    }

    #[test]
    fn producer_thread_never_blocks_and_consumer_sees_newest() {
        let slot = PositionSlot::new();
        let producer = {
            let slot = slot.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    assert!(slot.publish(Position::new(i as f32, 0.0)));
                }
            })
        };
        producer.join().unwrap();

        assert_eq!(slot.wait_take(Duration::from_millis(10)), Some(Position::new(999.0, 0.0)));
    }

    #[test]
    fn wait_take_wakes_on_publish() {
        let slot = PositionSlot::new();
        let consumer = {
            let slot = slot.clone();
            thread::spawn(move || slot.wait_take(Duration::from_secs(5)))
        };
        thread::sleep(Duration::from_millis(20));
        slot.publish(Position::new(7.0, 7.0));

        assert_eq!(consumer.join().unwrap(), Some(Position::new(7.0, 7.0)));
    }

    #[test]
    fn react_reports_column_change() {
        let mut repo = board();
        repo.hide_row(&row("r1"));
        let mut session = DragSession::new(DragItem::Row(row("r1")), col("A"));
        let mut scroller = RecordingScroller::default();
        let mut reactor = reactor();

        let reaction = reactor.react(
            &mut repo,
            &mut session,
            Position::new(300.0, 50.0),
            &mut scroller,
            Instant::now(),
        );

        assert_eq!(reaction.column, Some(col("B")));
        assert_eq!(reaction.column_changed, Some((col("A"), col("B"))));
        assert_eq!(reaction.scrolled, None);
        assert!(scroller.deltas.is_empty());
        assert!(reactor.measurement_pending(), "moved row schedules a re-measure");
    }

    #[test]
    fn sample_that_moves_nothing_schedules_nothing() {
        let mut repo = board();
        repo.hide_row(&row("r1"));
        let mut session = DragSession::new(DragItem::Row(row("r1")), col("A"));
        let mut reactor = reactor();

        let reaction = reactor.react(
            &mut repo,
            &mut session,
            Position::new(100.0, 200.0),
            &mut RecordingScroller::default(),
            Instant::now(),
        );

        assert_eq!(reaction.column, Some(col("A")));
        assert!(!reactor.measurement_pending());
    }

    #[test]
    fn edge_sample_scrolls_and_debounces_remeasure() {
        let mut repo = board();
        repo.hide_row(&row("r1"));
        let mut session = DragSession::new(DragItem::Row(row("r1")), col("A"));
        let mut scroller = RecordingScroller::default();
        let mut reactor = reactor();
        let start = Instant::now();

        for i in 0..3u32 {
            let now = start + Duration::from_millis(10) * i;
            let reaction = reactor.react(&mut repo, &mut session, Position::new(390.0, 50.0), &mut scroller, now);
            assert!(reaction.scrolled.is_some());
        }

        assert_eq!(scroller.deltas, vec![8.0, 8.0, 8.0]);
        assert_eq!(repo.layouts().valid_count(), 0, "scroll invalidates layouts");
        assert!(reactor.measurement_pending());

        assert!(!reactor.poll_measurement(&mut repo, start + Duration::from_millis(50)));
        assert!(reactor.poll_measurement(&mut repo, start + Duration::from_millis(120)));
        assert!(repo.layouts().valid_count() > 0);
        assert!(!reactor.poll_measurement(&mut repo, start + Duration::from_millis(500)));
    }

    #[test]
    fn edge_sample_outside_columns_does_not_scroll() {
        let mut repo = board();
        let mut session = DragSession::new(DragItem::Row(row("r1")), col("A"));
        let mut scroller = RecordingScroller::default();

        let reaction = reactor().react(
            &mut repo,
            &mut session,
            Position::new(450.0, 50.0),
            &mut scroller,
            Instant::now(),
        );

        assert_eq!(reaction.column, None);
        assert!(scroller.deltas.is_empty());
    }
}
