use serde::{Deserialize, Serialize};

/// The six feedback dimensions, in the order they are always requested.
pub const CATEGORY_TITLES: [&str; 6] = [
    "Writing Requirements Adherence",
    "Grammatical Range and Accuracy",
    "Lexical Resource",
    "Coherence and Cohesion",
    "Punctuation and Mechanics",
    IDIOMS_CATEGORY,
];

/// Category whose suggestions carry idiom / example / meaning instead of error / fix / reason.
pub const IDIOMS_CATEGORY: &str = "Collocations and Idioms";

/// Levels at or above this index get advanced enrichment (C1, C2).
pub const ENRICHMENT_MIN_LEVEL_INDEX: usize = 4;

/// CEFR-style proficiency scale, ordered from lowest to highest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ProficiencyLevel {
    A1,
    A2,
    #[default]
    B1,
    B2,
    C1,
    C2,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 6] = [
        ProficiencyLevel::A1,
        ProficiencyLevel::A2,
        ProficiencyLevel::B1,
        ProficiencyLevel::B2,
        ProficiencyLevel::C1,
        ProficiencyLevel::C2,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ProficiencyLevel::A1 => "A1",
            ProficiencyLevel::A2 => "A2",
            ProficiencyLevel::B1 => "B1",
            ProficiencyLevel::B2 => "B2",
            ProficiencyLevel::C1 => "C1",
            ProficiencyLevel::C2 => "C2",
        }
    }

    /// Display label offered to users, e.g. "C1 Advanced".
    pub fn label(self) -> &'static str {
        match self {
            ProficiencyLevel::A1 => "A1 Beginner",
            ProficiencyLevel::A2 => "A2 Elementary",
            ProficiencyLevel::B1 => "B1 Intermediate",
            ProficiencyLevel::B2 => "B2 Upper-Intermediate",
            ProficiencyLevel::C1 => "C1 Advanced",
            ProficiencyLevel::C2 => "C2 Proficient",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Resolves a label by its leading code ("C1 Advanced" -> C1).
    /// Returns `None` for anything unrecognized.
    pub fn from_label(label: &str) -> Option<Self> {
        let code = label.split_whitespace().next()?;
        Self::ALL.into_iter().find(|level| level.code() == code)
    }

    pub fn wants_enrichment(self) -> bool {
        self.index() >= ENRICHMENT_MIN_LEVEL_INDEX
    }
}

/// Everything the composer needs for one submission.
#[derive(Debug, Clone)]
pub struct FeedbackRequest {
    pub requirements: String,
    pub prompt: String,
    pub student_writing: String,
    /// Label as chosen by the user; embedded verbatim in the prompt.
    pub proficiency_level: String,
    pub word_count: usize,
}

impl FeedbackRequest {
    pub fn level(&self) -> Option<ProficiencyLevel> {
        ProficiencyLevel::from_label(&self.proficiency_level)
    }
}

/// A flagged span and its proposed fix.
/// In the idioms category: `original` = idiom, `changed` = example, `explanation` = meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub original: String,
    pub changed: String,
    pub explanation: String,
    pub rule_summary: String,
    pub rule_meaning_vn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCategory {
    pub title: String,
    pub score: i32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<Suggestion>,
}

impl FeedbackCategory {
    pub fn is_idioms(&self) -> bool {
        self.title == IDIOMS_CATEGORY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarSuggestion {
    pub structure: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularySuggestion {
    pub word: String,
    pub definition: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedEnrichment {
    pub grammar: Vec<GrammarSuggestion>,
    pub vocabulary: Vec<VocabularySuggestion>,
}

/// Full structured feedback. `overall_score` is always recomputed locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIFeedback {
    pub overall_score: i32,
    pub overall_feedback: String,
    pub categories: Vec<FeedbackCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_enrichment: Option<AdvancedEnrichment>,
}
