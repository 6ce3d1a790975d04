//! Prompt Synthesizer — builds the question-generation instruction text.
//!
//! Selects a complexity band from the 1-100 score, embeds the unified skill
//! set and a truncated resume excerpt, and optionally wraps caller-supplied
//! custom instructions in a validation gate. The gate is advisory: the model
//! judges relevance and either complies or returns the refusal object the
//! response parser recognizes.

use std::collections::HashSet;

use crate::generation::prompts::{GENERATION_PROMPT_TEMPLATE, INSTRUCTION_GATE_TEMPLATE};
use crate::models::question::ComplexityBand;

/// Max resume characters embedded in the generation prompt. Longer text is
/// truncated with a visible ellipsis marker. Tunable without touching the
/// parsing logic.
pub const PROMPT_CONTEXT_MAX_CHARS: usize = 2000;

/// Inputs to prompt synthesis.
#[derive(Debug)]
pub struct PromptParams<'a> {
    pub role: &'a str,
    pub combined_skills: &'a HashSet<String>,
    pub complexity_score: u8,
    pub question_count: u32,
    pub resume_text: &'a str,
    pub custom_instructions: Option<&'a str>,
}

/// Maps the 1-100 complexity score onto a band.
pub fn complexity_band(score: u8) -> ComplexityBand {
    if score <= 30 {
        ComplexityBand::Beginner
    } else if score <= 70 {
        ComplexityBand::Intermediate
    } else {
        ComplexityBand::Advanced
    }
}

/// Builds the final instruction text sent to the model.
pub fn build_generation_prompt(params: &PromptParams<'_>) -> String {
    let band = complexity_band(params.complexity_score);

    // Skill iteration order is unspecified; sort for a stable prompt.
    let mut skills: Vec<&str> = params.combined_skills.iter().map(String::as_str).collect();
    skills.sort_unstable();

    let mut prompt = GENERATION_PROMPT_TEMPLATE
        .replace("{question_count}", &params.question_count.to_string())
        .replace("{role}", params.role)
        .replace("{skills}", &skills.join(", "))
        .replace("{complexity_band}", band.label())
        .replace("{complexity_score}", &params.complexity_score.to_string())
        .replace(
            "{resume_excerpt}",
            &excerpt(params.resume_text, PROMPT_CONTEXT_MAX_CHARS),
        );

    if let Some(instructions) = params.custom_instructions {
        if !instructions.trim().is_empty() {
            prompt.push_str(
                &INSTRUCTION_GATE_TEMPLATE.replace("{custom_instructions}", instructions.trim()),
            );
        }
    }

    prompt
}

/// Truncates `text` to at most `max_chars` characters, appending a visible
/// ellipsis marker when anything was cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
