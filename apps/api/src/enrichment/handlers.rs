//! Axum route handlers for the enrichment API. These never return an
//! error for external failures; the response carries fallback text instead.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::enrichment::analysis::{summarize, SUMMARY_RECORD_LIMIT};
use crate::enrichment::discovery::{discover, DiscoveryOutcome};
use crate::enrichment::sectors::{all_profiles, SectorProfile, DEFAULT_REGION, REGIONS};
use crate::errors::AppError;
use crate::leads::worklist::Worklist;
use crate::models::company::CompanyType;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: String,
    pub records_analysed: usize,
}

#[derive(Debug, Serialize)]
pub struct SectorsResponse {
    pub sectors: Vec<SectorProfile>,
    pub regions: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
pub struct DiscoveryRequest {
    pub sector: CompanyType,
    #[serde(default)]
    pub region: Option<String>,
}

/// POST /api/v1/analysis
///
/// AI summary of the stored companies (first 50 rows).
pub async fn handle_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let worklist = Worklist::load(&state).await?;
    let analysis = summarize(&worklist.records, state.llm.as_ref()).await;

    Ok(Json(AnalysisResponse {
        analysis,
        records_analysed: worklist.records.len().min(SUMMARY_RECORD_LIMIT),
    }))
}

/// GET /api/v1/discovery/sectors
pub async fn handle_sectors() -> Json<SectorsResponse> {
    Json(SectorsResponse {
        sectors: all_profiles(),
        regions: REGIONS.to_vec(),
    })
}

/// POST /api/v1/discovery
///
/// Searches the web for companies of one sector in one region and returns
/// the filtered hits plus an AI assessment. Nothing is saved.
pub async fn handle_discovery(
    State(state): State<AppState>,
    Json(request): Json<DiscoveryRequest>,
) -> Result<Json<DiscoveryOutcome>, AppError> {
    let region = request
        .region
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let outcome = discover(
        state.search.as_ref(),
        state.llm.as_ref(),
        request.sector,
        &region,
    )
    .await;

    Ok(Json(outcome))
}
