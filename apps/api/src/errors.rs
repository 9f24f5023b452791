use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::feedback::normalizer::FeedbackError;
use crate::llm_client::LlmError;

/// Message shown for every failure that happens after the model call was attempted.
pub const FEEDBACK_FAILED_MESSAGE: &str = "Failed to get feedback from the AI. Please try again.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No API key configured")]
    MissingCredential,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Submission superseded by a newer request")]
    Superseded,

    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FeedbackError> for AppError {
    fn from(err: FeedbackError) -> Self {
        match err {
            FeedbackError::MalformedResponse(e) => AppError::MalformedResponse(e.to_string()),
        }
    }
}

impl AppError {
    /// The text a client should show for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingCredential => {
                "Please provide your Google AI Studio API key in the configuration section."
                    .to_string()
            }
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Superseded => {
                "This request was replaced by a newer submission.".to_string()
            }
            AppError::Provider(_) | AppError::MalformedResponse(_) => {
                FEEDBACK_FAILED_MESSAGE.to_string()
            }
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::MissingCredential => (StatusCode::BAD_REQUEST, "MISSING_CREDENTIAL"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Superseded => (StatusCode::CONFLICT, "SUPERSEDED"),
            AppError::Provider(e) => {
                tracing::error!("Provider error: {e}");
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR")
            }
            AppError::MalformedResponse(msg) => {
                tracing::error!("Malformed model response: {msg}");
                (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}
