//! Axum route handlers for the question generation API.
//!
//! The multipart boundary performs all unrecoverable-input validation (role,
//! skills, score range, count, file presence) before the pipeline runs.

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::generation::generator::{
    generate_questions, DocumentSource, GenerateQuestionsRequest, QuestionSetOutcome,
};
use crate::models::question::{ComplexityBand, QuestionRecord, RefusalNotice};
use crate::state::AppState;

/// Raw multipart fields before validation.
#[derive(Debug, Default)]
struct GenerateForm {
    role: Option<String>,
    skills: Option<String>,
    question_complexity: Option<String>,
    number_of_questions: Option<String>,
    custom_instructions: Option<String>,
    include_expected_answers: Option<String>,
    file_name: Option<String>,
    file_bytes: Option<Bytes>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsResponse {
    pub success: bool,
    pub data: GenerateQuestionsData,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsData {
    pub role: String,
    pub requested_skills: Vec<String>,
    pub question_complexity: u8,
    pub number_of_questions: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity_band: Option<ComplexityBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<QuestionRecord>>,
    /// Present instead of `questions` when the instruction gate fired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refusal: Option<RefusalNotice>,
}

/// POST /api/v1/questions/generate
///
/// Multipart form: `role`, `skills` (JSON array string), `questionComplexity`,
/// `numberOfQuestions`, optional `customInstructions`, optional
/// `includeExpectedAnswers`, and the resume PDF in the `pdf` part.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let form = read_form(multipart).await?;
    let request = validate_form(form)?;

    let role = request.role.clone();
    let requested_skills = request.requested_skills.clone();
    let question_complexity = request.complexity_score;
    let number_of_questions = request.question_count;

    let outcome =
        generate_questions(state.llm.as_ref(), state.store.as_ref(), request).await?;

    let data = match outcome {
        QuestionSetOutcome::Questions(set) => GenerateQuestionsData {
            role,
            requested_skills,
            question_complexity,
            number_of_questions,
            complexity_band: Some(set.complexity_band),
            combined_skills: Some(set.combined_skills),
            degraded: Some(set.degraded),
            questions: Some(set.questions),
            refusal: None,
        },
        QuestionSetOutcome::Refused(notice) => GenerateQuestionsData {
            role,
            requested_skills,
            question_complexity,
            number_of_questions,
            complexity_band: None,
            combined_skills: None,
            degraded: None,
            questions: None,
            refusal: Some(notice),
        },
    };

    Ok(Json(GenerateQuestionsResponse {
        success: true,
        data,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<GenerateForm, AppError> {
    let mut form = GenerateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "pdf" => {
                form.file_name = field.file_name().map(str::to_string);
                form.file_bytes = Some(field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read uploaded file: {e}"))
                })?);
            }
            _ => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read field '{name}': {e}"))
                })?;
                match name.as_str() {
                    "role" => form.role = Some(text),
                    "skills" => form.skills = Some(text),
                    "questionComplexity" => form.question_complexity = Some(text),
                    "numberOfQuestions" => form.number_of_questions = Some(text),
                    "customInstructions" => form.custom_instructions = Some(text),
                    "includeExpectedAnswers" => form.include_expected_answers = Some(text),
                    _ => {} // unknown fields are ignored
                }
            }
        }
    }

    Ok(form)
}

fn validate_form(form: GenerateForm) -> Result<GenerateQuestionsRequest, AppError> {
    let role = form
        .role
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Role is required".to_string()))?;

    let requested_skills = parse_skills(form.skills.as_deref())?;

    let complexity_score = form
        .question_complexity
        .as_deref()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|c| (1..=100).contains(c))
        .ok_or_else(|| {
            AppError::Validation("Question complexity must be a number between 1 and 100".to_string())
        })? as u8;

    let question_count = form
        .number_of_questions
        .as_deref()
        .and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n >= 1)
        .ok_or_else(|| {
            AppError::Validation("Number of questions must be a positive number".to_string())
        })?;

    let file_bytes = form
        .file_bytes
        .ok_or_else(|| AppError::Validation("PDF file is required".to_string()))?;
    let file_name = form.file_name.unwrap_or_else(|| "resume.pdf".to_string());

    let include_expected_answers = form
        .include_expected_answers
        .map(|v| v.trim() != "false")
        .unwrap_or(true);

    Ok(GenerateQuestionsRequest {
        role: role.trim().to_string(),
        requested_skills,
        complexity_score,
        question_count,
        document: DocumentSource {
            file_name,
            bytes: file_bytes,
        },
        custom_instructions: form.custom_instructions,
        include_expected_answers,
    })
}

/// Skills arrive as a JSON array string (`["Go", "SQL"]`), matching the
/// upload client contract.
fn parse_skills(raw: Option<&str>) -> Result<Vec<String>, AppError> {
    let error = || {
        AppError::Validation("Skills array is required and must not be empty".to_string())
    };

    let raw = raw.ok_or_else(error)?;
    let value: Value = serde_json::from_str(raw).map_err(|_| error())?;
    let skills: Vec<String> = serde_json::from_value(value).map_err(|_| error())?;

    if skills.iter().all(|s| s.trim().is_empty()) {
        return Err(error());
    }
    Ok(skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
