//! Request composer: turns a `FeedbackRequest` into the schema + prompt pair
//! sent to the model. Pure: no I/O, no logging.

use serde_json::Value;

use crate::feedback::models::{FeedbackRequest, CATEGORY_TITLES};
use crate::feedback::prompts::{ENRICHMENT_INSTRUCTION, FEEDBACK_PROMPT_TEMPLATE};
use crate::feedback::schema::build_response_schema;

/// What goes over the wire for one submission.
#[derive(Debug, Clone)]
pub struct ComposedRequest {
    pub schema: Value,
    pub prompt: String,
    pub includes_enrichment: bool,
}

/// Builds schema and prompt. An unrecognized level code never fails; it only
/// skips the enrichment branch.
pub fn compose(request: &FeedbackRequest) -> ComposedRequest {
    let includes_enrichment = request
        .level()
        .map(|level| level.wants_enrichment())
        .unwrap_or(false);

    let categories = CATEGORY_TITLES.join(", ");
    let word_count = request.word_count.to_string();

    let mut prompt = fill_template(
        FEEDBACK_PROMPT_TEMPLATE,
        &[
            ("level", request.proficiency_level.as_str()),
            ("requirements", request.requirements.as_str()),
            ("prompt", request.prompt.as_str()),
            ("student_writing", request.student_writing.as_str()),
            ("categories", categories.as_str()),
            ("word_count", word_count.as_str()),
        ],
    );

    if includes_enrichment {
        prompt.push_str(ENRICHMENT_INSTRUCTION);
    }

    ComposedRequest {
        schema: build_response_schema(includes_enrichment),
        prompt,
        includes_enrichment,
    }
}

/// Replaces `{key}` placeholders in one left-to-right pass. Unknown braces are
/// copied through untouched.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let hit = values.iter().find_map(|(key, value)| {
            let placeholder_len = key.len() + 2;
            let matches = tail.len() >= placeholder_len
                && tail[1..].starts_with(key)
                && tail[1 + key.len()..].starts_with('}');
            matches.then_some((placeholder_len, *value))
        });

        match hit {
            Some((len, value)) => {
                out.push_str(value);
                rest = &tail[len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
