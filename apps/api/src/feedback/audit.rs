//! Feedback audit: non-fatal checks of what the prompt asks the model to honor.
//!
//! The normalizer trusts the model's field contracts; this pass reports where
//! they were broken without modifying the feedback.

use serde::{Deserialize, Serialize};

use crate::feedback::models::{AIFeedback, CATEGORY_TITLES};

const MIN_CATEGORY_SCORE: i32 = 1;
const MAX_CATEGORY_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    OriginalNotInWriting,
    ScoreOutOfRange,
    UnexpectedCategoryCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackWarning {
    /// Category title the warning refers to; `None` for whole-response warnings.
    pub category: Option<String>,
    pub kind: WarningKind,
    pub detail: String,
}

/// Checks substring exactness of `original`, score ranges and category count.
///
/// The idioms category is exempt from the substring check: its `original`
/// holds a suggested idiom, not a quote from the writing.
pub fn audit_feedback(feedback: &AIFeedback, student_writing: &str) -> Vec<FeedbackWarning> {
    let mut warnings = Vec::new();

    if feedback.categories.len() != CATEGORY_TITLES.len() {
        warnings.push(FeedbackWarning {
            category: None,
            kind: WarningKind::UnexpectedCategoryCount,
            detail: format!(
                "expected {} categories, got {}",
                CATEGORY_TITLES.len(),
                feedback.categories.len()
            ),
        });
    }

    for category in &feedback.categories {
        if !(MIN_CATEGORY_SCORE..=MAX_CATEGORY_SCORE).contains(&category.score) {
            warnings.push(FeedbackWarning {
                category: Some(category.title.clone()),
                kind: WarningKind::ScoreOutOfRange,
                detail: format!(
                    "score {} outside {}..={}",
                    category.score, MIN_CATEGORY_SCORE, MAX_CATEGORY_SCORE
                ),
            });
        }

        if category.is_idioms() {
            continue;
        }

        for suggestion in &category.suggestions {
            if !student_writing.contains(suggestion.original.as_str()) {
                warnings.push(FeedbackWarning {
                    category: Some(category.title.clone()),
                    kind: WarningKind::OriginalNotInWriting,
                    detail: format!("'{}' does not appear in the writing", suggestion.original),
                });
            }
        }
    }

    warnings
}
