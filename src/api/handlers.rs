//! HTTP endpoint handlers for the study helpers, profiles and server status

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::{error, info, warn};

use super::{
    error::ApiError,
    responses::{
        CheckAnswerRequest, FeedbackRequest, FeedbackResponse, FlashcardsRequest,
        FlashcardsResponse, HealthResponse, ReflectionRequest, ReflectionResponse,
        StatusResponse, StudyPlanRequest, StudyPlanResponse, SummarizeRequest, SummaryResponse,
    },
};
use crate::{
    models::User,
    services::{build_study_plan, AnswerFeedback, RegisterProfile},
    state::AppState,
};

const DEFAULT_FLASHCARD_COUNT: usize = 5;
const MAX_FLASHCARD_COUNT: usize = 20;
const MAX_REFLECTION_COUNT: usize = 10;
const MAX_PLAN_DAYS: u32 = 365;
const MAX_HOURS_PER_DAY: u32 = 24;

/// Trimmed, non-empty text or `None`
fn required(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Handle POST /api/summarize
pub async fn summarize_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(request) = payload?;
    let content = required(request.content.as_ref())
        .ok_or_else(|| ApiError::BadRequest("Content is required".to_string()))?;

    match state.generator.summarize(content).await {
        Ok(summary) => {
            info!(content_len = content.len(), "Summary generated");
            Ok(Json(SummaryResponse { summary }))
        }
        Err(e) => {
            error!("Error summarizing text: {}", e);
            Err(ApiError::Upstream("Failed to summarize text".to_string()))
        }
    }
}

/// Handle POST /api/study-plan
pub async fn study_plan_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StudyPlanRequest>, JsonRejection>,
) -> Result<Json<StudyPlanResponse>, ApiError> {
    let Json(request) = payload?;
    let (Some(subjects), Some(days), Some(hours)) =
        (request.subjects, request.days_available, request.hours_per_day)
    else {
        return Err(ApiError::missing_fields());
    };

    let subjects: Vec<String> = subjects
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if subjects.is_empty() || days == 0 || hours == 0 {
        return Err(ApiError::missing_fields());
    }
    if days > MAX_PLAN_DAYS || hours > MAX_HOURS_PER_DAY {
        return Err(ApiError::BadRequest(format!(
            "daysAvailable must be at most {MAX_PLAN_DAYS} and hoursPerDay at most {MAX_HOURS_PER_DAY}"
        )));
    }

    let mut plan = build_study_plan(&subjects, days, hours);

    if state.generator.is_configured() {
        match state.generator.study_plan_outline(&subjects, days, hours).await {
            Ok(outline) => plan.outline = Some(outline),
            Err(e) => warn!("Study plan outline unavailable: {}", e),
        }
    }

    info!(subjects = subjects.len(), days, hours, "Study plan generated");
    Ok(Json(StudyPlanResponse { plan }))
}

/// Handle POST /api/flashcards
pub async fn flashcards_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FlashcardsRequest>, JsonRejection>,
) -> Result<Json<FlashcardsResponse>, ApiError> {
    let Json(request) = payload?;
    let content = required(request.content.as_ref())
        .ok_or_else(|| ApiError::BadRequest("Content is required".to_string()))?;
    let count = request.count.unwrap_or(DEFAULT_FLASHCARD_COUNT);
    if !(1..=MAX_FLASHCARD_COUNT).contains(&count) {
        return Err(ApiError::BadRequest(format!(
            "count must be between 1 and {MAX_FLASHCARD_COUNT}"
        )));
    }

    match state.generator.generate_flashcards(content, count).await {
        Ok(flashcards) => Ok(Json(FlashcardsResponse { flashcards })),
        Err(e) => {
            error!("Error generating flashcards: {}", e);
            Err(ApiError::Upstream("Failed to generate flashcards".to_string()))
        }
    }
}

/// Handle POST /api/check-answer
pub async fn check_answer_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CheckAnswerRequest>, JsonRejection>,
) -> Result<Json<AnswerFeedback>, ApiError> {
    let Json(request) = payload?;
    let (Some(question), Some(answer)) = (
        required(request.question.as_ref()),
        required(request.answer.as_ref()),
    ) else {
        return Err(ApiError::missing_fields());
    };

    state
        .generator
        .check_answer(question, answer)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error checking answer: {}", e);
            ApiError::Upstream("Failed to check answer".to_string())
        })
}

/// Handle POST /api/feedback
pub async fn feedback_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, ApiError> {
    let Json(request) = payload?;
    let (Some(student_work), Some(assignment)) = (
        required(request.student_work.as_ref()),
        required(request.assignment.as_ref()),
    ) else {
        return Err(ApiError::missing_fields());
    };

    match state.generator.assignment_feedback(student_work, assignment).await {
        Ok(feedback) => {
            info!(work_len = student_work.len(), "Assignment feedback generated");
            Ok(Json(FeedbackResponse { feedback }))
        }
        Err(e) => {
            error!("Error getting assignment feedback: {}", e);
            Err(ApiError::Upstream("Failed to generate feedback".to_string()))
        }
    }
}

/// Handle POST /api/reflection-questions
///
/// Falls back to the local question set instead of failing.
pub async fn reflection_questions_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReflectionRequest>, JsonRejection>,
) -> Result<Json<ReflectionResponse>, ApiError> {
    let Json(request) = payload?;
    let topic = required(request.topic.as_ref())
        .ok_or_else(|| ApiError::BadRequest("Topic is required".to_string()))?;
    let reflection = state.focus.reflection();
    let count = request.count.unwrap_or_else(|| reflection.count());
    if !(1..=MAX_REFLECTION_COUNT).contains(&count) {
        return Err(ApiError::BadRequest(format!(
            "count must be between 1 and {MAX_REFLECTION_COUNT}"
        )));
    }

    let questions = reflection.questions_with_count(topic, count).await;
    Ok(Json(ReflectionResponse { questions }))
}

/// Handle POST /api/auth/register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterProfile>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let Json(profile) = payload?;
    let (Some(uid), Some(email)) = (required(profile.uid.as_ref()), required(profile.email.as_ref()))
    else {
        return Err(ApiError::missing_fields());
    };

    let user = state.profiles.register(uid, email, &profile).await;
    state.record_action("register");
    Ok(Json(user))
}

/// Handle GET /api/users/:uid
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Path(uid): Path<String>,
) -> Result<Json<User>, ApiError> {
    state
        .profiles
        .get(&uid)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        environment: state.environment,
        generator_configured: state.generator.is_configured(),
        focus_sessions: state.focus.len(),
        profiles: state.profiles.len().await,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
