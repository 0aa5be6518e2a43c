use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::leads::scoring::{compute_score, score_label, ScoringConfig};
use crate::models::company::{CallStatus, CompanyRecord, CompanyType, ProjectPhase, WorkKind};

pub const MAX_PROJECT_COUNT: i64 = 10;

/// Form submission for a new company. `score` and `priority` are not part
/// of the input; they are always derived.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub company_type: CompanyType,
    pub work_kind: WorkKind,
    /// Signed so that negative input reaches validation instead of failing
    /// deserialization with an opaque message.
    pub project_count: i64,
    #[serde(default)]
    pub vacancies_active: bool,
    pub project_phase: ProjectPhase,
    pub status: CallStatus,
    #[serde(default)]
    pub last_contact: Option<NaiveDate>,
    #[serde(default)]
    pub next_action: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
#[error("{}", .issues.join("; "))]
pub struct ValidationError {
    pub issues: Vec<String>,
}

/// Validates a submission and turns it into a scored record.
/// `today` is used when no contact date was entered.
pub fn build_record(
    submission: NewCompany,
    config: &ScoringConfig,
    today: NaiveDate,
) -> Result<CompanyRecord, ValidationError> {
    let mut issues = Vec::new();

    let name = submission.name.trim().to_string();
    if name.is_empty() {
        issues.push("Company name is required".to_string());
    }

    if !(0..=MAX_PROJECT_COUNT).contains(&submission.project_count) {
        issues.push(format!(
            "project_count must be between 0 and {MAX_PROJECT_COUNT}, got {}",
            submission.project_count
        ));
    }

    if !issues.is_empty() {
        return Err(ValidationError { issues });
    }

    // range-checked above
    let project_count = submission.project_count as u8;
    let score = compute_score(
        project_count,
        submission.vacancies_active,
        submission.work_kind,
        submission.project_phase,
        config,
    );

    Ok(CompanyRecord {
        name,
        company_type: submission.company_type,
        work_kind: submission.work_kind,
        project_count,
        vacancies_active: submission.vacancies_active,
        project_phase: submission.project_phase,
        score,
        priority: score_label(score, &config.thresholds),
        status: submission.status,
        last_contact: Some(submission.last_contact.unwrap_or(today)),
        next_action: non_blank(submission.next_action),
        note: non_blank(submission.note),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
