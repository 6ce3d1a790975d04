//! Generation Response Parser — recovers structure from the free-form model
//! reply.
//!
//! Three tiers, tried in order:
//! 1. Refusal sentinel: the first balanced `{...}` span decoding to an object
//!    with an `error` field is returned as-is, before any array parsing.
//! 2. Well-formed path: the first balanced `[...]` span decoding to question
//!    records is returned verbatim.
//! 3. Degraded fallback: one synthetic record per non-blank line. This tier
//!    never fails — every non-empty reply yields at least one record.

use serde_json::Value;
use tracing::warn;

use crate::generation::json_span::{find_array_span, find_object_span};
use crate::models::question::{ComplexityBand, QuestionCategory, QuestionRecord, RefusalNotice};

/// Expected-answer text attached to records synthesized by the fallback tier.
const FALLBACK_EXPECTED_ANSWER: &str = "To be evaluated by interviewer";

/// Tagged parse result. `Degraded` carries the same payload shape as
/// `Parsed` so callers branch on fidelity without restructuring.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    /// The instruction gate fired: the model refused to generate.
    Refusal(RefusalNotice),
    /// A well-formed question array was recovered.
    Parsed(Vec<QuestionRecord>),
    /// Heuristic line-splitting fallback.
    Degraded(Vec<QuestionRecord>),
}

/// Parses the raw model reply into questions or a refusal sentinel.
pub fn parse_generation_reply(reply: &str) -> ParsedReply {
    if let Some(notice) = parse_refusal(reply) {
        return ParsedReply::Refusal(notice);
    }

    if let Some(span) = find_array_span(reply) {
        if let Ok(questions) = serde_json::from_str::<Vec<QuestionRecord>>(span) {
            return ParsedReply::Parsed(questions);
        }
    }

    warn!("Generation reply had no usable JSON structure, falling back to line splitting");
    ParsedReply::Degraded(split_into_records(reply))
}

/// Checks the first balanced object span for the gate's refusal shape.
/// Objects without an `error` field (e.g. a question object inside the
/// array) fall through to array parsing.
fn parse_refusal(reply: &str) -> Option<RefusalNotice> {
    let span = find_object_span(reply)?;
    let value: Value = serde_json::from_str(span).ok()?;
    value.get("error")?;
    serde_json::from_value::<RefusalNotice>(value).ok()
}

/// Terminal fallback: one record per non-blank line, tagged with fixed
/// category, complexity, and skills. A reply with no non-blank lines still
/// produces a single record from the whole trimmed reply.
fn split_into_records(reply: &str) -> Vec<QuestionRecord> {
    let records: Vec<QuestionRecord> = reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(fallback_record)
        .collect();

    if records.is_empty() {
        return vec![fallback_record(reply.trim())];
    }
    records
}

fn fallback_record(text: &str) -> QuestionRecord {
    QuestionRecord {
        question: text.to_string(),
        category: QuestionCategory::Technical,
        complexity: ComplexityBand::Intermediate,
        expected_answer: Some(FALLBACK_EXPECTED_ANSWER.to_string()),
        skills: vec!["general".to_string()],
    }
}
