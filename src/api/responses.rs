//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::Environment,
    services::{FlashcardDraft, ReflectionQuestion, StudyPlan},
    tasks::TimerSnapshot,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRequest {
    pub subjects: Option<Vec<String>>,
    pub days_available: Option<u32>,
    pub hours_per_day: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StudyPlanResponse {
    pub plan: StudyPlan,
}

#[derive(Debug, Default, Deserialize)]
pub struct FlashcardsRequest {
    pub content: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FlashcardsResponse {
    pub flashcards: Vec<FlashcardDraft>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckAnswerRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub student_work: Option<String>,
    pub assignment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReflectionRequest {
    pub topic: Option<String>,
    pub count: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReflectionResponse {
    pub questions: Vec<ReflectionQuestion>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicRequest {
    pub topic: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BlockSiteRequest {
    pub site: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnswerRequest {
    pub answer: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FocusCreatedResponse {
    pub id: Uuid,
    pub session: TimerSnapshot,
}

/// Server status with focus and provider information
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub environment: Environment,
    pub generator_configured: bool,
    pub focus_sessions: usize,
    pub profiles: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
