//! Question Generation — orchestrates the full pipeline.
//!
//! Flow: extract document text → structured resume extraction + skill
//! unification → duplicate check / persist-or-reuse → prompt synthesis →
//! LLM generate → response parsing → optional answer stripping.
//!
//! Degradation policy: text extraction, profile parsing, and reply parsing
//! each fall back rather than abort; the two model calls and nothing else are
//! fatal. The second model call is never issued without document text.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::document::extract_document_text;
use crate::generation::duplicate::check_duplicate;
use crate::generation::prompt_builder::{build_generation_prompt, complexity_band, PromptParams};
use crate::generation::response_parser::{parse_generation_reply, ParsedReply};
use crate::generation::resume_parser::extract_profile;
use crate::llm_client::{GenerativeModel, SamplingConfig};
use crate::models::candidate::NewCandidate;
use crate::models::question::{ComplexityBand, QuestionRecord, RefusalNotice};
use crate::store::CandidateStore;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// The uploaded document: raw bytes plus the caller-supplied display name.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub file_name: String,
    pub bytes: Bytes,
}

/// A validated request for question generation.
/// Boundary validation (score range, count, non-empty skills) happens at the
/// HTTP layer before this is constructed.
#[derive(Debug, Clone)]
pub struct GenerateQuestionsRequest {
    pub role: String,
    pub requested_skills: Vec<String>,
    pub complexity_score: u8,
    pub question_count: u32,
    pub document: DocumentSource,
    pub custom_instructions: Option<String>,
    /// When false, expected answers are stripped from the returned records.
    pub include_expected_answers: bool,
}

/// A successfully generated question set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    pub questions: Vec<QuestionRecord>,
    pub complexity_band: ComplexityBand,
    /// Unified skill set (extracted ∪ requested), sorted for stable output.
    pub combined_skills: Vec<String>,
    /// True when any stage fell back: placeholder document text, placeholder
    /// profile, or line-split question parsing.
    pub degraded: bool,
}

/// Terminal pipeline output: either questions or the instruction-gate
/// refusal. Distinguishable without inspecting error types.
#[derive(Debug, Clone)]
pub enum QuestionSetOutcome {
    Questions(QuestionSet),
    Refused(RefusalNotice),
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full generation pipeline.
///
/// Steps:
/// 1. extract_document_text() → plain text or degraded placeholder
/// 2. extract_profile() → ExtractedProfile + unified skills (placeholder on parse failure)
/// 3. duplicate check → reuse the recent record or persist a new one
/// 4. build_generation_prompt() → instruction text (banding + optional gate)
/// 5. LLM generate
/// 6. parse_generation_reply() → questions, degraded questions, or refusal
pub async fn generate_questions(
    llm: &dyn GenerativeModel,
    store: &dyn CandidateStore,
    request: GenerateQuestionsRequest,
) -> Result<QuestionSetOutcome, AppError> {
    // Step 1: Document text (never fails; degrades to placeholder)
    let document = extract_document_text(&request.document.bytes, &request.document.file_name);
    info!(
        "Extracted {} chars from '{}' (degraded: {})",
        document.text.len(),
        request.document.file_name,
        document.degraded
    );

    // Step 2: Structured extraction + skill unification
    let extraction = extract_profile(llm, &document.text, &request.requested_skills)
        .await
        .map_err(|e| AppError::Llm(format!("Resume extraction call failed: {e}")))?;

    // Step 3: Duplicate check and persist-or-reuse. Not on the critical path:
    // store failures degrade with a warning instead of aborting generation.
    if extraction.profile.has_placeholder_identity() {
        info!("Profile has no usable identity, skipping duplicate check and persistence");
    } else {
        persist_or_reuse(store, &extraction.profile, &request).await;
    }

    // Step 4: Prompt synthesis
    let prompt = build_generation_prompt(&PromptParams {
        role: &request.role,
        combined_skills: &extraction.combined_skills,
        complexity_score: request.complexity_score,
        question_count: request.question_count,
        resume_text: &document.text,
        custom_instructions: request.custom_instructions.as_deref(),
    });

    // Step 5: Generation call (fatal on failure, no retry)
    let reply = llm
        .invoke(&prompt, &SamplingConfig::generation())
        .await
        .map_err(|e| AppError::Llm(format!("Question generation call failed: {e}")))?;

    // Step 6: Parse
    let (mut questions, parse_degraded) = match parse_generation_reply(&reply) {
        ParsedReply::Refusal(notice) => {
            info!("Instruction gate fired: {}", notice.error);
            return Ok(QuestionSetOutcome::Refused(notice));
        }
        ParsedReply::Parsed(questions) => (questions, false),
        ParsedReply::Degraded(questions) => {
            warn!("Degraded question parsing produced {} records", questions.len());
            (questions, true)
        }
    };

    if !request.include_expected_answers {
        strip_expected_answers(&mut questions);
    }

    let mut combined_skills: Vec<String> = extraction.combined_skills.into_iter().collect();
    combined_skills.sort_unstable();

    info!(
        "Generated {} questions for role '{}'",
        questions.len(),
        request.role
    );

    Ok(QuestionSetOutcome::Questions(QuestionSet {
        questions,
        complexity_band: complexity_band(request.complexity_score),
        combined_skills,
        degraded: document.degraded || extraction.degraded || parse_degraded,
    }))
}

/// Reuses a duplicate record inside the window, otherwise inserts a new one.
async fn persist_or_reuse(
    store: &dyn CandidateStore,
    profile: &crate::models::candidate::ExtractedProfile,
    request: &GenerateQuestionsRequest,
) {
    let email = &profile.personal_info.email;
    match check_duplicate(store, email, &request.role, &request.requested_skills).await {
        Ok(result) if result.is_within_window => {
            info!(
                "Reusing candidate record for '{}' submitted within the duplicate window",
                email
            );
        }
        Ok(_) => {
            let candidate = NewCandidate {
                profile: profile.clone(),
                role: request.role.clone(),
                requested_skills: request.requested_skills.clone(),
            };
            match store.insert(candidate).await {
                Ok(row) => info!("Stored candidate record {}", row.id),
                Err(e) => warn!("Failed to store candidate record: {e}, continuing"),
            }
        }
        Err(e) => warn!("Duplicate check failed: {e}, continuing without persistence"),
    }
}

/// Post-processing option: remove expected answers when the caller should not
/// see them. External to the parser itself.
fn strip_expected_answers(questions: &mut [QuestionRecord]) {
    for question in questions {
        question.expected_answer = None;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use crate::generation::duplicate::same_skill_set;
    use crate::llm_client::LlmError;
    use crate::models::candidate::CandidateRow;
    use uuid::Uuid;

    /// Model double that replays scripted replies and records prompts.
    struct ScriptedModel {
        replies: Mutex<VecDeque<Result<String, String>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing_on_second_call(first: &str) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from([
                    Ok(first.to_string()),
                    Err("endpoint unreachable".to_string()),
                ])),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompt(&self, index: usize) -> String {
            self.prompts.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn invoke(&self, prompt: &str, _: &SamplingConfig) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(message)) => Err(LlmError::Api {
                    status: 503,
                    message,
                }),
                None => panic!("scripted model ran out of replies"),
            }
        }
    }

    /// In-memory candidate store mirroring the Postgres filter contract.
    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<CandidateRow>>,
    }

    impl MemoryStore {
        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CandidateStore for MemoryStore {
        async fn find_recent(
            &self,
            email: &str,
            role: &str,
            requested_skills: &[String],
            since: DateTime<Utc>,
        ) -> anyhow::Result<Option<CandidateRow>> {
            let email = email.to_lowercase();
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.email == email && r.role_applied == role && r.created_at >= since)
                .find(|r| same_skill_set(&r.requested_skills, requested_skills))
                .cloned())
        }

        async fn insert(&self, candidate: NewCandidate) -> anyhow::Result<CandidateRow> {
            let profile = &candidate.profile;
            let row = CandidateRow {
                id: Uuid::new_v4(),
                full_name: profile.personal_info.full_name.clone(),
                email: profile.personal_info.email.to_lowercase(),
                phone: profile.personal_info.phone.clone(),
                location: profile.personal_info.location.clone(),
                linkedin: profile.personal_info.linkedin.clone(),
                current_title: profile.professional_info.current_title.clone(),
                years_of_experience: profile.professional_info.years_of_experience.clone(),
                education: profile.professional_info.education.clone(),
                certifications: profile.professional_info.certifications.clone(),
                professional_summary: profile.professional_summary.clone(),
                work_experience: serde_json::to_value(&profile.work_experience)?,
                technical_skills: profile.technical_skills.clone(),
                soft_skills: profile.soft_skills.clone(),
                role_applied: candidate.role,
                requested_skills: candidate.requested_skills,
                status: "In Progress".to_string(),
                created_at: Utc::now(),
            };
            self.rows.lock().unwrap().push(row.clone());
            Ok(row)
        }
    }

    const PROFILE_REPLY: &str = r#"{
        "personalInfo": {"fullName": "Jane Doe", "email": "jane@example.com"},
        "technicalSkills": ["Go", "SQL"]
    }"#;

    const QUESTIONS_REPLY: &str = r#"[
        {"question": "Explain indexes.", "type": "technical", "complexity": "intermediate",
         "expectedAnswer": "B-tree basics.", "skills": ["SQL"]},
        {"question": "Describe a tough bug.", "type": "behavioral", "complexity": "intermediate",
         "expectedAnswer": "Debugging narrative.", "skills": ["general"]}
    ]"#;

    fn request(skills: &[&str]) -> GenerateQuestionsRequest {
        GenerateQuestionsRequest {
            role: "Backend Engineer".to_string(),
            requested_skills: skills.iter().map(|s| s.to_string()).collect(),
            complexity_score: 55,
            question_count: 2,
            document: DocumentSource {
                file_name: "resume.pdf".to_string(),
                bytes: Bytes::from_static(b"not a real pdf"),
            },
            custom_instructions: None,
            include_expected_answers: true,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_with_degraded_extraction() {
        // Unextractable document → placeholder text flows through the whole
        // pipeline and the requested skills survive unification.
        let model = ScriptedModel::new(&[PROFILE_REPLY, QUESTIONS_REPLY]);
        let store = MemoryStore::default();

        let outcome = generate_questions(&model, &store, request(&["SQL", "Rust"]))
            .await
            .unwrap();

        // The extraction prompt embedded the placeholder document text
        assert!(model.prompt(0).contains("PDF content from resume.pdf"));
        // The generation prompt did too
        assert!(model.prompt(1).contains("PDF content from resume.pdf"));

        let QuestionSetOutcome::Questions(set) = outcome else {
            panic!("expected questions");
        };
        assert_eq!(set.questions.len(), 2);
        assert_eq!(set.complexity_band, ComplexityBand::Intermediate);
        assert!(set.degraded, "placeholder document text must flag degradation");
        for skill in ["Go", "Rust", "SQL"] {
            assert!(set.combined_skills.iter().any(|s| s == skill));
        }
        // Real identity extracted → record persisted
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_placeholder_profile_skips_persistence() {
        let model = ScriptedModel::new(&["no structured data", QUESTIONS_REPLY]);
        let store = MemoryStore::default();

        let outcome = generate_questions(&model, &store, request(&["SQL"]))
            .await
            .unwrap();

        let QuestionSetOutcome::Questions(set) = outcome else {
            panic!("expected questions");
        };
        assert!(set.degraded);
        assert_eq!(set.combined_skills, vec!["SQL".to_string()]);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_within_window_is_reused_not_reinserted() {
        let model = ScriptedModel::new(&[PROFILE_REPLY, QUESTIONS_REPLY]);
        let store = MemoryStore::default();

        // First run inserts
        generate_questions(&model, &store, request(&["SQL", "Rust"]))
            .await
            .unwrap();
        assert_eq!(store.len(), 1);

        // Second identical run reuses
        let model = ScriptedModel::new(&[PROFILE_REPLY, QUESTIONS_REPLY]);
        generate_questions(&model, &store, request(&["SQL", "Rust"]))
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_refusal_sentinel_is_terminal_output() {
        let refusal = r#"{"error": "Instructions unrelated to role", "reason": "Asked for trivia"}"#;
        let model = ScriptedModel::new(&[PROFILE_REPLY, refusal]);
        let store = MemoryStore::default();

        let mut req = request(&["SQL"]);
        req.custom_instructions = Some("Ask pub-quiz trivia instead".to_string());

        let outcome = generate_questions(&model, &store, req).await.unwrap();
        let QuestionSetOutcome::Refused(notice) = outcome else {
            panic!("expected refusal");
        };
        assert_eq!(notice.error, "Instructions unrelated to role");
    }

    #[tokio::test]
    async fn test_generation_call_failure_is_fatal_with_stage_context() {
        let model = ScriptedModel::failing_on_second_call(PROFILE_REPLY);
        let store = MemoryStore::default();

        let error = generate_questions(&model, &store, request(&["SQL"]))
            .await
            .unwrap_err();

        match error {
            AppError::Llm(message) => {
                assert!(message.contains("Question generation call failed"));
                assert!(message.contains("endpoint unreachable"));
            }
            other => panic!("expected Llm error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_expected_answers_can_be_stripped() {
        let model = ScriptedModel::new(&[PROFILE_REPLY, QUESTIONS_REPLY]);
        let store = MemoryStore::default();

        let mut req = request(&["SQL"]);
        req.include_expected_answers = false;

        let outcome = generate_questions(&model, &store, req).await.unwrap();
        let QuestionSetOutcome::Questions(set) = outcome else {
            panic!("expected questions");
        };
        assert!(set.questions.iter().all(|q| q.expected_answer.is_none()));
    }

    #[tokio::test]
    async fn test_plain_text_reply_degrades_to_line_records() {
        let model = ScriptedModel::new(&[PROFILE_REPLY, "Q one\nQ two\nQ three"]);
        let store = MemoryStore::default();

        let outcome = generate_questions(&model, &store, request(&["SQL"]))
            .await
            .unwrap();
        let QuestionSetOutcome::Questions(set) = outcome else {
            panic!("expected questions");
        };
        assert_eq!(set.questions.len(), 3);
        assert!(set.degraded);
    }
}
