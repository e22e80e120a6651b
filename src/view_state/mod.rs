//! Measured geometry and the pure decisions made from it.
//!
//! Nothing here mutates board data: layouts are cached, hit-tests are
//! computed, auto-scroll steps and tween offsets are derived.

pub mod auto_scroll;
pub mod debounce;
pub mod handles;
pub mod layout_store;
pub mod spring;

pub use auto_scroll::{AutoScrollConfig, AutoScrollController, ScrollAxis, ScrollContainer, ScrollStep};
pub use debounce::MeasureDebouncer;
pub use handles::{ColumnHandle, ColumnHandles, StaticColumnHandle};
pub use hit_test::{column_at, hit_test, HitTestResult, RowTarget};
pub use layout_store::{LayoutKey, LayoutStore, Measured};
pub use spring::SpringReturn;
