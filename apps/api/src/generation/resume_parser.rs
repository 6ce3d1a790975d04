//! Structured Resume Extractor — turns raw resume text into an
//! [`ExtractedProfile`] via an LLM extraction call.
//!
//! The model call itself is fatal on failure (propagated to the caller), but
//! parsing of the reply never is: any absent, malformed, or mismatched JSON
//! degrades to the fixed placeholder profile and the pipeline continues.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::generation::json_span::find_object_span;
use crate::generation::prompt_builder::excerpt;
use crate::generation::prompts::RESUME_EXTRACT_PROMPT_TEMPLATE;
use crate::llm_client::{GenerativeModel, LlmError, SamplingConfig};
use crate::models::candidate::ExtractedProfile;

/// Max resume characters embedded in the extraction prompt. Longer text is
/// truncated with a visible ellipsis marker. Tunable without touching the
/// parsing logic.
pub const RESUME_EXCERPT_MAX_CHARS: usize = 3000;

/// Result of the extraction stage: the profile, the unified skill set, and
/// whether the profile came from the degraded fallback.
#[derive(Debug, Clone)]
pub struct ResumeExtraction {
    pub profile: ExtractedProfile,
    pub combined_skills: HashSet<String>,
    pub degraded: bool,
}

/// Runs the structured extraction call and unifies skills.
///
/// Only a failed model call returns an error; an unparsable reply substitutes
/// [`ExtractedProfile::placeholder`] and reports `degraded = true`.
pub async fn extract_profile(
    llm: &dyn GenerativeModel,
    resume_text: &str,
    requested_skills: &[String],
) -> Result<ResumeExtraction, LlmError> {
    let prompt = RESUME_EXTRACT_PROMPT_TEMPLATE
        .replace("{resume_text}", &excerpt(resume_text, RESUME_EXCERPT_MAX_CHARS));

    let reply = llm.invoke(&prompt, &SamplingConfig::extraction()).await?;

    let (profile, degraded) = match parse_profile_reply(&reply) {
        Some(profile) => (profile, false),
        None => {
            warn!("Resume extraction reply was not parsable, substituting placeholder profile");
            (ExtractedProfile::placeholder(), true)
        }
    };

    let combined_skills = unify_skills(&profile.technical_skills, requested_skills);
    info!(
        "Resume extraction complete: {} technical skills, {} combined",
        profile.technical_skills.len(),
        combined_skills.len()
    );

    Ok(ResumeExtraction {
        profile,
        combined_skills,
        degraded,
    })
}

/// Decodes the first balanced `{...}` span of the reply as a profile.
/// Returns `None` when no span exists or the span does not match the schema.
fn parse_profile_reply(reply: &str) -> Option<ExtractedProfile> {
    let span = find_object_span(reply)?;
    serde_json::from_str::<ExtractedProfile>(span).ok()
}

/// Deduplicated union of extracted and requested skills.
/// Iteration order is not a contract.
pub fn unify_skills(extracted: &[String], requested: &[String]) -> HashSet<String> {
    extracted.iter().chain(requested.iter()).cloned().collect()
}
