//! Candidate record store.
//!
//! The pipeline only speaks the [`CandidateStore`] trait: `find_recent` for
//! duplicate detection and `insert` for persisting a freshly extracted
//! profile. Production wires in [`PgCandidateStore`]; tests use an in-memory
//! double. Schema ownership lives with the store, not the pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::generation::duplicate::same_skill_set;
use crate::models::candidate::{CandidateRow, NewCandidate};

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Returns the most recent candidate record matching the lower-cased
    /// email, the role, and the exact requested-skill set, created at or
    /// after `since`. Read-only.
    async fn find_recent(
        &self,
        email: &str,
        role: &str,
        requested_skills: &[String],
        since: DateTime<Utc>,
    ) -> anyhow::Result<Option<CandidateRow>>;

    /// Inserts a new candidate record and returns the stored row.
    async fn insert(&self, candidate: NewCandidate) -> anyhow::Result<CandidateRow>;
}

/// PostgreSQL-backed candidate store.
#[derive(Clone)]
pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn find_recent(
        &self,
        email: &str,
        role: &str,
        requested_skills: &[String],
        since: DateTime<Utc>,
    ) -> anyhow::Result<Option<CandidateRow>> {
        // Email and role narrow the scan in SQL; exact skill-set equality is
        // order-independent, so it is checked in Rust over the few recent rows.
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT * FROM candidates
            WHERE lower(email) = $1 AND role_applied = $2 AND created_at >= $3
            ORDER BY created_at DESC
            "#,
        )
        .bind(email.to_lowercase())
        .bind(role)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .find(|row| same_skill_set(&row.requested_skills, requested_skills)))
    }

    async fn insert(&self, candidate: NewCandidate) -> anyhow::Result<CandidateRow> {
        let profile = &candidate.profile;
        let work_experience = serde_json::to_value(&profile.work_experience)?;

        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates
                (id, full_name, email, phone, location, linkedin,
                 current_title, years_of_experience, education, certifications,
                 professional_summary, work_experience, technical_skills, soft_skills,
                 role_applied, requested_skills, status, created_at)
            VALUES ($1, $2, lower($3), $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, 'In Progress', now())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&profile.personal_info.full_name)
        .bind(&profile.personal_info.email)
        .bind(&profile.personal_info.phone)
        .bind(&profile.personal_info.location)
        .bind(&profile.personal_info.linkedin)
        .bind(&profile.professional_info.current_title)
        .bind(&profile.professional_info.years_of_experience)
        .bind(&profile.professional_info.education)
        .bind(&profile.professional_info.certifications)
        .bind(&profile.professional_summary)
        .bind(&work_experience)
        .bind(&profile.technical_skills)
        .bind(&profile.soft_skills)
        .bind(&candidate.role)
        .bind(&candidate.requested_skills)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
