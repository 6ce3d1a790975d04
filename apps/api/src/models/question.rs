//! Interview question models: the typed record produced by the response
//! parser and the refusal sentinel produced by the instruction gate.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Question category requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionCategory {
    Technical,
    Behavioral,
    ProblemSolving,
}

/// Complexity band derived from the 1-100 score. Reported to the caller and
/// embedded in the generation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityBand {
    Beginner,
    Intermediate,
    Advanced,
}

impl ComplexityBand {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

/// A single generated interview question.
///
/// Wire field names match the generation prompt schema exactly so a model
/// reply deserializes without translation. `expectedAnswer` is optional so
/// callers can strip it when answers should not be disclosed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    #[serde(rename = "type")]
    pub category: QuestionCategory,
    pub complexity: ComplexityBand,
    #[serde(rename = "expectedAnswer", skip_serializing_if = "Option::is_none")]
    pub expected_answer: Option<String>,
    pub skills: Vec<String>,
}

/// The refusal sentinel the model returns when custom instructions are judged
/// unrelated, contradictory, or inappropriate for the stated role and skills.
///
/// `error` is required; everything else the model authored is carried through
/// untouched so the caller sees the object as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefusalNotice {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
