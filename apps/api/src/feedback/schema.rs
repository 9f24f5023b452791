//! Response schema sent to Gemini as `generationConfig.responseSchema`.
//!
//! Gemini uses an OpenAPI subset with upper-case type names. The shape mirrors
//! `AIFeedback` field for field; `advancedEnrichment` only appears when the
//! caller asks for it.

use serde_json::{json, Value};

fn suggestion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "original": {
                "type": "STRING",
                "description": "The EXACT substring from the student's raw text. Do NOT autocorrect. If they wrote 'First, students', you must return 'First, students'."
            },
            "changed": { "type": "STRING", "description": "The corrected version." },
            "explanation": {
                "type": "STRING",
                "description": "In Vietnamese, explain why the change is needed."
            },
            "rule_summary": {
                "type": "STRING",
                "description": "A very short, simple (A2 level) English imperative sentence (max 8 words) summarizing the rule."
            },
            "rule_meaning_vn": {
                "type": "STRING",
                "description": "The Vietnamese translation of the 'rule_summary'."
            }
        },
        "required": ["original", "changed", "explanation", "rule_summary", "rule_meaning_vn"]
    })
}

fn category_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "score": { "type": "INTEGER", "description": "Score from 1 to 10." },
            "strengths": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "In Vietnamese."
            },
            "weaknesses": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "In Vietnamese."
            },
            "suggestions": { "type": "ARRAY", "items": suggestion_schema() }
        },
        "required": ["title", "score", "strengths", "weaknesses", "suggestions"]
    })
}

fn enrichment_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "grammar": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "structure": { "type": "STRING" },
                        "example": { "type": "STRING" }
                    },
                    "required": ["structure", "example"]
                }
            },
            "vocabulary": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "word": { "type": "STRING" },
                        "definition": { "type": "STRING" },
                        "example": { "type": "STRING" }
                    },
                    "required": ["word", "definition", "example"]
                }
            }
        },
        "required": ["grammar", "vocabulary"]
    })
}

/// Builds the full response schema. `advancedEnrichment` stays optional even
/// when present: it is added to `properties` but not to `required`.
pub fn build_response_schema(include_enrichment: bool) -> Value {
    let mut properties = json!({
        "overallScore": { "type": "INTEGER" },
        "overallFeedback": { "type": "STRING" },
        "categories": { "type": "ARRAY", "items": category_schema() }
    });

    if include_enrichment {
        properties["advancedEnrichment"] = enrichment_schema();
    }

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": ["overallScore", "overallFeedback", "categories"]
    })
}
