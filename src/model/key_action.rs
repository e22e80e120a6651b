//! Domain actions triggered by keyboard input.

/// Actions the terminal front end understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Abort the drag in progress.
    CancelDrag,
    /// Scroll the board one step backward.
    ScrollLeft,
    /// Scroll the board one step forward.
    ScrollRight,
}
