//! State management module
//!
//! The pomodoro state machine and the application-wide state shared by
//! handlers.

pub mod app_state;
pub mod blocklist;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, AppStateBuilder};
pub use blocklist::{normalize_site, BlocklistError, SiteBlocklist};
pub use timer_state::{TimerError, TimerEvent, TimerPhase, TimerSettings, TimerState};
