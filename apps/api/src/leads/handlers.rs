//! Axum route handlers for the company worklist.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::leads::intake::{build_record, NewCompany};
use crate::leads::prioritization::{
    call_today, full_overview, summarize_priorities, OverviewGrouping, OverviewRow,
    PrioritySummary,
};
use crate::leads::worklist::{append_record, Worklist};
use crate::models::company::CompanyRecord;
use crate::state::AppState;

pub const NO_COMPANIES_MESSAGE: &str = "No companies recorded yet.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    #[serde(default)]
    pub grouping: OverviewGrouping,
}

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub companies: Vec<OverviewRow>,
    pub summary: PrioritySummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallTodayResponse {
    pub companies: Vec<CompanyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub company: CompanyRecord,
    pub message: String,
}

fn placeholder(is_empty: bool) -> Option<String> {
    is_empty.then(|| NO_COMPANIES_MESSAGE.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/companies
///
/// Validates and scores the submission, then appends it to the store.
/// A rejected submission leaves the store untouched.
pub async fn handle_create_company(
    State(state): State<AppState>,
    Json(request): Json<NewCompany>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let today = chrono::Local::now().date_naive();
    let record = build_record(request, &state.scoring, today)?;

    append_record(&state, record.clone()).await?;
    info!("Company '{}' saved with score {}", record.name, record.score);

    let message = format!("Saved (score {}%)", record.score);
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            company: record,
            message,
        }),
    ))
}

/// GET /api/v1/companies/call-today
pub async fn handle_call_today(
    State(state): State<AppState>,
) -> Result<Json<CallTodayResponse>, AppError> {
    let worklist = Worklist::load(&state).await?;
    let companies = call_today(&worklist.records);

    Ok(Json(CallTodayResponse {
        message: placeholder(worklist.records.is_empty()),
        companies,
    }))
}

/// GET /api/v1/companies?grouping=by_status|insertion
pub async fn handle_overview(
    State(state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<OverviewResponse>, AppError> {
    let worklist = Worklist::load(&state).await?;
    let companies = full_overview(
        &worklist.records,
        query.grouping,
        worklist.today,
        state.config.follow_up_days,
    );

    Ok(Json(OverviewResponse {
        summary: summarize_priorities(&worklist.records),
        message: placeholder(worklist.records.is_empty()),
        companies,
    }))
}
