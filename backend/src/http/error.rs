//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::llm::{ExplainerError, GPT_FAILED_MESSAGE};
use crate::services::playground::PlaygroundError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Request conflicts with one already in flight
    Conflict(String),
    /// The explainer failed
    Explainer(ExplainerError),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(crate::db::repository::RepositoryError),
}

impl AppError {
    pub fn session_not_found(id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("Session not found: {}", id))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", msg)),
            AppError::Explainer(e) => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("EXPLAINER_ERROR", GPT_FAILED_MESSAGE).with_details(e.to_string()),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("REPOSITORY_ERROR", e.to_string()),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<crate::db::repository::RepositoryError> for AppError {
    fn from(err: crate::db::repository::RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

impl From<ExplainerError> for AppError {
    fn from(err: ExplainerError) -> Self {
        AppError::Explainer(err)
    }
}

impl From<PlaygroundError> for AppError {
    fn from(err: PlaygroundError) -> Self {
        match err {
            PlaygroundError::BlockNotFound(_) | PlaygroundError::ChainNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            PlaygroundError::UnknownTemplate(_)
            | PlaygroundError::EmptyPrompt
            | PlaygroundError::EmptyChain(_)
            | PlaygroundError::BlankField(_)
            | PlaygroundError::NotEnoughBlocks(_) => AppError::BadRequest(err.to_string()),
            PlaygroundError::Busy | PlaygroundError::StaleTicket(_) => {
                AppError::Conflict(err.to_string())
            }
            PlaygroundError::Explainer(e) => AppError::Explainer(e),
        }
    }
}
