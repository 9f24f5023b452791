//! Response normalizer: parses model output into `AIFeedback` and replaces the
//! model's overall score with one derived from the category scores.

use thiserror::Error;

use crate::feedback::models::{AIFeedback, FeedbackCategory};
use crate::llm_client::strip_json_fences;

/// Points available per category.
const CATEGORY_MAX_SCORE: i64 = 10;

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("model output is not valid feedback JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

/// Parses raw model text and recomputes `overall_score`.
/// Field contracts (substring exactness, score ranges) are not checked here.
pub fn normalize_response(raw: &str) -> Result<AIFeedback, FeedbackError> {
    let text = strip_json_fences(raw);
    let mut feedback: AIFeedback = serde_json::from_str(text)?;

    if let Some(score) = recompute_overall_score(&feedback.categories) {
        feedback.overall_score = score;
    }

    Ok(feedback)
}

/// round(sum / (n × 10) × 100). `None` when there are no categories.
pub fn recompute_overall_score(categories: &[FeedbackCategory]) -> Option<i32> {
    if categories.is_empty() {
        return None;
    }
    let total: i64 = categories.iter().map(|c| i64::from(c.score)).sum();
    let max = categories.len() as i64 * CATEGORY_MAX_SCORE;
    let percent = (total as f64 / max as f64 * 100.0).round();
    Some(percent as i32)
}
