//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod error;
pub mod focus;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use focus::*;
use handlers::*;

pub use error::ApiError;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/summarize", post(summarize_handler))
        .route("/api/study-plan", post(study_plan_handler))
        .route("/api/flashcards", post(flashcards_handler))
        .route("/api/check-answer", post(check_answer_handler))
        .route("/api/feedback", post(feedback_handler))
        .route("/api/reflection-questions", post(reflection_questions_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/users/:uid", get(get_user_handler))
        // Focus sessions
        .route("/api/focus", post(create_focus_handler))
        .route("/api/focus/:id", get(get_focus_handler).delete(delete_focus_handler))
        .route("/api/focus/:id/next", get(next_snapshot_handler))
        .route("/api/focus/:id/topic", put(topic_handler))
        .route("/api/focus/:id/settings", put(settings_handler))
        .route("/api/focus/:id/start", post(start_handler))
        .route("/api/focus/:id/pause", post(pause_handler))
        .route("/api/focus/:id/reset", post(reset_handler))
        .route("/api/focus/:id/mute", post(mute_handler))
        .route("/api/focus/:id/questions", delete(dismiss_questions_handler))
        .route("/api/focus/:id/questions/:index", put(answer_question_handler))
        .route("/api/focus/:id/blocked-sites", post(block_site_handler))
        .route("/api/focus/:id/blocked-sites/:site", delete(unblock_site_handler))
        .route("/api/focus/:id/blocking", post(toggle_blocking_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
