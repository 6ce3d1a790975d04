//! Candidate-facing routes: duplicate checking against the record store.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::duplicate::{check_duplicate, DuplicateCheckResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDuplicateRequest {
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub requested_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckDuplicateResponse {
    pub success: bool,
    pub data: DuplicateCheckResult,
    pub message: String,
    pub timestamp: String,
}

/// POST /api/v1/candidates/check-duplicate
///
/// Reports whether a matching submission exists within the duplicate window.
pub async fn handle_check_duplicate(
    State(state): State<AppState>,
    Json(request): Json<CheckDuplicateRequest>,
) -> Result<Json<CheckDuplicateResponse>, AppError> {
    if request.email.trim().is_empty() {
        return Err(AppError::Validation("Email is required".to_string()));
    }

    let result = check_duplicate(
        state.store.as_ref(),
        request.email.trim(),
        &request.role,
        &request.requested_skills,
    )
    .await
    .map_err(AppError::Internal)?;

    Ok(Json(CheckDuplicateResponse {
        success: true,
        data: result,
        message: "Duplicate check completed".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}
