//! Plain-text feedback report, suitable for copying into a message or document.

use crate::feedback::models::{AIFeedback, FeedbackCategory};

const SECTION_RULE: &str = "========================================";
const CATEGORY_RULE: &str = "----------------------------------------";

pub fn format_report(feedback: &AIFeedback) -> String {
    let mut text = String::from("Feedback Report\n\n");
    text.push_str(&format!("Overall Score: {}/100\n", feedback.overall_score));
    text.push_str(&format!("Overall Feedback: {}\n\n", feedback.overall_feedback));
    text.push_str(SECTION_RULE);
    text.push_str("\n\n");

    for category in &feedback.categories {
        push_category(&mut text, category);
    }

    if let Some(enrichment) = &feedback.advanced_enrichment {
        text.push_str("ADVANCED ENRICHMENT\n\n");
        text.push_str("Grammar Structures:\n");
        for g in &enrichment.grammar {
            text.push_str(&format!("- {}: \"{}\"\n", g.structure, g.example));
        }
        text.push('\n');

        text.push_str("Vocabulary:\n");
        for v in &enrichment.vocabulary {
            text.push_str(&format!("- {} ({}): \"{}\"\n", v.word, v.definition, v.example));
        }
    }

    text
}

fn push_category(text: &mut String, category: &FeedbackCategory) {
    text.push_str(&format!("CATEGORY: {}\n", category.title));
    text.push_str(&format!("Score: {}/10\n\n", category.score));

    text.push_str("Strengths:\n");
    for s in &category.strengths {
        text.push_str(&format!("- {s}\n"));
    }
    text.push('\n');

    text.push_str("Weaknesses:\n");
    for w in &category.weaknesses {
        text.push_str(&format!("- {w}\n"));
    }
    text.push('\n');

    if !category.suggestions.is_empty() {
        text.push_str("Suggestions:\n");
        for (i, s) in category.suggestions.iter().enumerate() {
            let n = i + 1;
            if category.is_idioms() {
                text.push_str(&format!("{n}. Idiom: {}\n", s.original));
                text.push_str(&format!("   Meaning: {}\n", s.explanation));
                text.push_str(&format!("   Example: \"{}\"\n\n", s.changed));
            } else {
                text.push_str(&format!("{n}. Original: \"{}\"\n", s.original));
                text.push_str(&format!("   Suggestion: \"{}\"\n", s.changed));
                text.push_str(&format!("   Reason: {}\n\n", s.explanation));
            }
        }
    }

    text.push_str(CATEGORY_RULE);
    text.push_str("\n\n");
}
