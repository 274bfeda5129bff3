//! HTTP error mapping

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::debug;

use super::responses::ErrorResponse;
use crate::state::{BlocklistError, TimerError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    /// The generative provider failed and there is no local substitute
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    pub fn missing_fields() -> Self {
        ApiError::BadRequest("Missing required fields".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TimerError> for ApiError {
    fn from(err: TimerError) -> Self {
        match err {
            TimerError::TopicRequired => ApiError::Unprocessable(err.to_string()),
            TimerError::InvalidSettings { .. } => ApiError::BadRequest(err.to_string()),
            TimerError::Closed => ApiError::NotFound(err.to_string()),
            TimerError::TopicLocked
            | TimerError::SettingsLocked
            | TimerError::InvalidTransition { .. } => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<BlocklistError> for ApiError {
    fn from(err: BlocklistError) -> Self {
        match err {
            BlocklistError::EmptySite => ApiError::BadRequest(err.to_string()),
            BlocklistError::AlreadyBlocked(_) => ApiError::Conflict(err.to_string()),
            BlocklistError::NotBlocked(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
