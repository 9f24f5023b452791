//! Axum route handlers for the Feedback API.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::audit::FeedbackWarning;
use crate::feedback::models::{AIFeedback, FeedbackRequest, ProficiencyLevel};
use crate::feedback::report::format_report;
use crate::feedback::service::request_feedback;
use crate::feedback::session::{SessionState, SessionView, DEFAULT_SESSION_ID};
use crate::feedback::word_count::count_words;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub prompt: String,
    pub student_writing: String,
    /// Level label, e.g. "C1 Advanced". Defaults to B1.
    pub level: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitFeedbackResponse {
    pub session_id: String,
    pub generation: u64,
    pub word_count: usize,
    pub feedback: AIFeedback,
    pub warnings: Vec<FeedbackWarning>,
}

#[derive(Debug, Serialize)]
pub struct LevelsResponse {
    pub levels: Vec<&'static str>,
    pub default: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct WordCountRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct WordCountResponse {
    pub word_count: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/feedback
///
/// Runs one feedback submission. The credential is checked before anything
/// else; a blank key never reaches the model. If a newer submission for the
/// same session started meanwhile (or the session was reset), this one answers
/// 409 and its result is dropped, even when the result was itself a failure.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    Json(request): Json<SubmitFeedbackRequest>,
) -> Result<Json<SubmitFeedbackResponse>, AppError> {
    let session_id = request
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION_ID.to_string());

    let api_key = state.credentials.get().await;
    if api_key.trim().is_empty() {
        let err = AppError::MissingCredential;
        let generation = state.sessions.begin(&session_id).await;
        state
            .sessions
            .complete(&session_id, generation, Err(err.user_message()))
            .await;
        return Err(err);
    }

    if request.student_writing.trim().is_empty() {
        return Err(AppError::Validation(
            "student_writing cannot be empty".to_string(),
        ));
    }

    let feedback_request = FeedbackRequest {
        word_count: count_words(&request.student_writing),
        requirements: request.requirements,
        prompt: request.prompt,
        student_writing: request.student_writing,
        proficiency_level: request
            .level
            .unwrap_or_else(|| ProficiencyLevel::default().label().to_string()),
    };

    let request_id = Uuid::new_v4();
    let generation = state.sessions.begin(&session_id).await;
    info!(%request_id, session_id = %session_id, generation, "Feedback submission started");

    let result = request_feedback(state.model.as_ref(), &api_key, &feedback_request).await;

    let applied = state
        .sessions
        .complete(
            &session_id,
            generation,
            result.as_ref().cloned().map_err(|e| e.user_message()),
        )
        .await;

    // A superseded caller gets 409 whatever its own result was
    if !applied {
        warn!(%request_id, session_id = %session_id, generation, "Feedback superseded by newer submission");
        return Err(AppError::Superseded);
    }
    let outcome = result?;

    Ok(Json(SubmitFeedbackResponse {
        session_id,
        generation,
        word_count: outcome.word_count,
        feedback: outcome.feedback,
        warnings: outcome.warnings,
    }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<SessionView> {
    Json(state.sessions.view(&session_id).await)
}

/// DELETE /api/v1/sessions/:id
///
/// Back to idle. A submission still in flight for this session will be discarded.
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> StatusCode {
    state.sessions.reset(&session_id).await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/sessions/:id/report
///
/// Plain-text report of the session's current feedback.
pub async fn handle_session_report(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    match state.sessions.view(&session_id).await.state {
        SessionState::Ready { outcome, .. } => Ok((
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format_report(&outcome.feedback),
        )),
        _ => Err(AppError::NotFound(format!(
            "Session {session_id} has no feedback to report"
        ))),
    }
}

/// GET /api/v1/levels
pub async fn handle_levels() -> Json<LevelsResponse> {
    Json(LevelsResponse {
        levels: ProficiencyLevel::ALL.iter().map(|l| l.label()).collect(),
        default: ProficiencyLevel::default().label(),
    })
}

/// POST /api/v1/word-count
pub async fn handle_word_count(Json(request): Json<WordCountRequest>) -> Json<WordCountResponse> {
    Json(WordCountResponse {
        word_count: count_words(&request.text),
    })
}
