//! Candidate data models: the structured profile extracted from a resume and
//! the persisted candidate record derived from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Identity fields extracted from the resume.
///
/// The wire format is camelCase to match the extraction prompt schema.
/// Every field defaults so a partially-filled model reply still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfessionalInfo {
    pub current_title: String,
    pub years_of_experience: String,
    pub education: String,
    pub certifications: Vec<String>,
}

/// A single work-experience entry, in resume order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkExperience {
    pub title: String,
    pub company: String,
    pub years: String,
    pub description: String,
}

/// Structured resume data produced by the extraction stage.
/// Immutable once produced within a single pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractedProfile {
    pub personal_info: PersonalInfo,
    pub professional_info: ProfessionalInfo,
    pub professional_summary: String,
    pub work_experience: Vec<WorkExperience>,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
}

/// Email stored when the resume yields no usable identity. A profile carrying
/// it is never deduplicated or persisted against real candidates.
pub const PLACEHOLDER_EMAIL: &str = "unknown@email.com";

impl ExtractedProfile {
    /// The fixed fallback profile substituted when extraction fails for any
    /// reason. Identity fields are "Unknown" placeholders; skill lists are
    /// empty so the unified skill set degrades to the requested skills alone.
    pub fn placeholder() -> Self {
        Self {
            personal_info: PersonalInfo {
                full_name: "Unknown".to_string(),
                email: PLACEHOLDER_EMAIL.to_string(),
                phone: "Unknown".to_string(),
                location: "Unknown".to_string(),
                linkedin: String::new(),
            },
            professional_info: ProfessionalInfo {
                current_title: "Unknown".to_string(),
                years_of_experience: "Unknown".to_string(),
                education: "Unknown".to_string(),
                certifications: Vec::new(),
            },
            professional_summary: String::new(),
            work_experience: Vec::new(),
            technical_skills: Vec::new(),
            soft_skills: Vec::new(),
        }
    }

    /// True when the profile carries no real identity (extraction fell back
    /// or the model returned nothing usable for the email field).
    pub fn has_placeholder_identity(&self) -> bool {
        let email = self.personal_info.email.trim();
        email.is_empty() || email.eq_ignore_ascii_case(PLACEHOLDER_EMAIL)
    }
}

/// A persisted candidate record as stored in the `candidates` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub current_title: String,
    pub years_of_experience: String,
    pub education: String,
    pub certifications: Vec<String>,
    pub professional_summary: String,
    /// Work experience entries serialized as a JSON array.
    pub work_experience: Value,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub role_applied: String,
    pub requested_skills: Vec<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new candidate record.
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub profile: ExtractedProfile,
    pub role: String,
    pub requested_skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_profile_has_unknown_identity() {
        let profile = ExtractedProfile::placeholder();
        assert_eq!(profile.personal_info.full_name, "Unknown");
        assert_eq!(profile.personal_info.email, PLACEHOLDER_EMAIL);
        assert!(profile.technical_skills.is_empty());
        assert!(profile.has_placeholder_identity());
    }

    #[test]
    fn test_real_email_is_not_placeholder_identity() {
        let mut profile = ExtractedProfile::placeholder();
        profile.personal_info.email = "jane@example.com".to_string();
        assert!(!profile.has_placeholder_identity());
    }

    #[test]
    fn test_profile_decodes_from_camel_case_wire_format() {
        let json = r#"{
            "personalInfo": {
                "fullName": "Jane Doe",
                "email": "jane@example.com",
                "phone": "+1 555 0100",
                "location": "Berlin",
                "linkedin": "linkedin.com/in/janedoe"
            },
            "professionalInfo": {
                "currentTitle": "Backend Engineer",
                "yearsOfExperience": "6",
                "education": "BSc Computer Science",
                "certifications": ["AWS SAA"]
            },
            "professionalSummary": "Backend engineer focused on data platforms.",
            "workExperience": [
                {"title": "Engineer", "company": "Acme", "years": "2019-2024", "description": "APIs"}
            ],
            "technicalSkills": ["Rust", "PostgreSQL"],
            "softSkills": ["Communication"]
        }"#;

        let profile: ExtractedProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.personal_info.full_name, "Jane Doe");
        assert_eq!(profile.professional_info.current_title, "Backend Engineer");
        assert_eq!(profile.work_experience.len(), 1);
        assert_eq!(profile.technical_skills, vec!["Rust", "PostgreSQL"]);
    }

    #[test]
    fn test_profile_decodes_with_missing_fields() {
        // Partial replies must not fail deserialization
        let json = r#"{"technicalSkills": ["Go"]}"#;
        let profile: ExtractedProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.technical_skills, vec!["Go"]);
        assert!(profile.personal_info.full_name.is_empty());
    }
}
