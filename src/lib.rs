//! dragboard
//!
//! Drag-and-reorder engine for multi-column boards, plus a terminal front
//! end that drives it with the mouse.
//!
//! The engine is the pure core: [`state::BoardRepository`] owns the board
//! and the per-column [`view_state::layout_store::LayoutStore`], and
//! [`state::GestureController`] runs the press/drag/resolve state machine.
//! The [`view`] module is the impure shell that draws frames, publishes
//! geometry and feeds pointer input in.

pub mod config;
pub mod logging;
pub mod model;
pub mod source;
pub mod state;
pub mod view;
pub mod view_state;
