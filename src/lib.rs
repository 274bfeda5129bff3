//! Study Focus - a study companion server
//!
//! This library provides a pomodoro focus controller with reflection
//! questions at the end of each cycle, plus generative study helpers
//! (summaries, flashcards, study plans) and a small profile store.

pub mod config;
pub mod models;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
