//! Feedback pipeline: credential check → compose → model call → normalize → audit.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::feedback::audit::{audit_feedback, FeedbackWarning};
use crate::feedback::composer::compose;
use crate::feedback::models::{AIFeedback, FeedbackRequest};
use crate::feedback::normalizer::normalize_response;
use crate::llm_client::FeedbackModel;

/// Everything a successful submission produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackOutcome {
    pub word_count: usize,
    pub feedback: AIFeedback,
    pub warnings: Vec<FeedbackWarning>,
}

/// Runs one submission end to end. A blank `api_key` fails before the model is called.
pub async fn request_feedback(
    model: &dyn FeedbackModel,
    api_key: &str,
    request: &FeedbackRequest,
) -> Result<FeedbackOutcome, AppError> {
    if api_key.trim().is_empty() {
        return Err(AppError::MissingCredential);
    }

    let composed = compose(request);
    info!(
        model = model.model_name(),
        level = %request.proficiency_level,
        word_count = request.word_count,
        enrichment = composed.includes_enrichment,
        "Requesting writing feedback"
    );

    let raw = model
        .generate(api_key, &composed.prompt, &composed.schema)
        .await?;
    let feedback = normalize_response(&raw)?;

    let warnings = audit_feedback(&feedback, &request.student_writing);
    for w in &warnings {
        warn!(category = ?w.category, kind = ?w.kind, "{}", w.detail);
    }

    info!(
        overall_score = feedback.overall_score,
        categories = feedback.categories.len(),
        warnings = warnings.len(),
        "Feedback normalized"
    );

    Ok(FeedbackOutcome {
        word_count: request.word_count,
        feedback,
        warnings,
    })
}
