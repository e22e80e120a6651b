//! Board state and the drag state machine.
//!
//! The repository owns row/column order; the gesture controller owns the
//! drag lifecycle and is the only caller that mutates order during a drag.

pub mod board_repository;
pub mod gesture;
pub mod reactor;
pub mod session;
pub mod subscribers;

// Re-export for convenience
pub use board_repository::{BoardRepository, RowVisibility, SharedBoard};
pub use gesture::{DragListener, DragPhase, GestureController, HoverElement, PointerEvent};
pub use reactor::{PositionReactor, PositionSlot, Reaction};
pub use session::DragSession;
pub use subscribers::{BoardChange, ChangeCallback, SubscriptionId, Subscribers};
