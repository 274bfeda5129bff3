//! Focus session endpoints
//!
//! Each open focus view owns one session resource. Commands return the
//! session snapshot taken right after the command was applied.

use std::{sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;
use uuid::Uuid;

use super::{
    error::ApiError,
    responses::{AnswerRequest, BlockSiteRequest, FocusCreatedResponse, TopicRequest},
};
use crate::{
    state::{AppState, TimerSettings},
    tasks::{FocusSession, TimerSnapshot},
};

const LONG_POLL_WAIT: Duration = Duration::from_secs(25);

fn session(state: &AppState, id: &str) -> Result<Arc<FocusSession>, ApiError> {
    Uuid::parse_str(id)
        .ok()
        .and_then(|id| state.focus.get(&id))
        .ok_or_else(|| ApiError::NotFound("Focus session not found".to_string()))
}

/// Handle POST /api/focus
///
/// An empty body opens a session with the default settings.
pub async fn create_focus_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<FocusCreatedResponse>), ApiError> {
    let settings = if body.iter().all(u8::is_ascii_whitespace) {
        TimerSettings::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("Invalid timer settings: {}", e)))?
    };

    let session = state.focus.create(settings)?;
    state.record_action("focus-open");

    Ok((
        StatusCode::CREATED,
        Json(FocusCreatedResponse {
            id: session.id(),
            session: session.snapshot(),
        }),
    ))
}

/// Handle GET /api/focus/:id
pub async fn get_focus_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    Ok(Json(session(&state, &id)?.snapshot()))
}

/// Handle GET /api/focus/:id/next
///
/// Long-poll: answers with the next snapshot (usually the next tick), or the
/// current one when nothing changes within the wait.
pub async fn next_snapshot_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let session = session(&state, &id)?;
    Ok(Json(session.next_snapshot(LONG_POLL_WAIT).await))
}

/// Handle DELETE /api/focus/:id
pub async fn delete_focus_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session = session(&state, &id)?;
    if !state.focus.remove(&session.id()) {
        return Err(ApiError::NotFound("Focus session not found".to_string()));
    }
    state.record_action("focus-close");
    info!(session = %session.id(), "Focus view closed");
    Ok(StatusCode::NO_CONTENT)
}

/// Handle PUT /api/focus/:id/topic
pub async fn topic_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TopicRequest>, JsonRejection>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let session = session(&state, &id)?;
    let Json(request) = payload?;
    let topic = request
        .topic
        .ok_or_else(|| ApiError::BadRequest("Topic is required".to_string()))?;
    Ok(Json(session.set_topic(&topic)?))
}

/// Handle PUT /api/focus/:id/settings
pub async fn settings_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TimerSettings>, JsonRejection>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let session = session(&state, &id)?;
    let Json(settings) = payload?;
    let snapshot = session.update_settings(settings)?;
    state.record_action("focus-settings");
    Ok(Json(snapshot))
}

/// Handle POST /api/focus/:id/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let snapshot = session(&state, &id)?.start()?;
    state.record_action("focus-start");
    Ok(Json(snapshot))
}

/// Handle POST /api/focus/:id/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let snapshot = session(&state, &id)?.pause();
    state.record_action("focus-pause");
    Ok(Json(snapshot))
}

/// Handle POST /api/focus/:id/reset
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let snapshot = session(&state, &id)?.reset();
    state.record_action("focus-reset");
    Ok(Json(snapshot))
}

/// Handle POST /api/focus/:id/mute
pub async fn mute_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    Ok(Json(session(&state, &id)?.toggle_mute()))
}

/// Handle PUT /api/focus/:id/questions/:index
pub async fn answer_question_handler(
    State(state): State<Arc<AppState>>,
    Path((id, index)): Path<(String, usize)>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let session = session(&state, &id)?;
    let Json(request) = payload?;
    let answer = request.answer.unwrap_or_default();
    session
        .answer_question(index, &answer)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No reflection question at index {}", index)))
}

/// Handle DELETE /api/focus/:id/questions
pub async fn dismiss_questions_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    Ok(Json(session(&state, &id)?.dismiss_questions()))
}

/// Handle POST /api/focus/:id/blocked-sites
pub async fn block_site_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<BlockSiteRequest>, JsonRejection>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let session = session(&state, &id)?;
    let Json(request) = payload?;
    let site = request.site.unwrap_or_default();
    Ok(Json(session.block_site(&site)?))
}

/// Handle DELETE /api/focus/:id/blocked-sites/:site
pub async fn unblock_site_handler(
    State(state): State<Arc<AppState>>,
    Path((id, site)): Path<(String, String)>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    Ok(Json(session(&state, &id)?.unblock_site(&site)?))
}

/// Handle POST /api/focus/:id/blocking
pub async fn toggle_blocking_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TimerSnapshot>, ApiError> {
    let snapshot = session(&state, &id)?.toggle_blocking();
    state.record_action("focus-blocking");
    Ok(Json(snapshot))
}
