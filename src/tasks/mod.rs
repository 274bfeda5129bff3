//! Background tasks module
//!
//! Countdown drivers and reflection requests run as tokio tasks owned by
//! their focus session; the sweeper closes sessions left idle.

pub mod focus_timer;
pub mod session_sweeper;

// Re-export main types
pub use focus_timer::{FocusRegistry, FocusSession, TimerSnapshot};
pub use session_sweeper::session_sweeper_task;
