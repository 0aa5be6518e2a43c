//! Market discovery: search the web for companies of one sector in one
//! region, drop irrelevant hits, and let the model assess the rest.
//! Results are returned to the caller only; nothing is stored.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::enrichment::prompts::{DISCOVERY_PROMPT_TEMPLATE, DISCOVERY_SYSTEM};
use crate::enrichment::search::{LeadSearch, SearchError, SearchHit, MAX_RESULTS};
use crate::enrichment::sectors::{sector_profile, SectorProfile};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, LANGUAGE_INSTRUCTION};
use crate::llm_client::TextCompleter;
use crate::models::company::CompanyType;

pub const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(60);
pub const NO_VALID_COMPANIES_MESSAGE: &str = "No valid companies found for this sector and region.";
pub const SEARCH_UNAVAILABLE_MESSAGE: &str =
    "Web search is currently unavailable. Check the search credentials or try again later.";

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryOutcome {
    pub sector: CompanyType,
    pub region: String,
    pub companies: Vec<SearchHit>,
    pub analysis: Option<String>,
    pub message: Option<String>,
}

/// False when the hit's name or snippet mentions one of the sector's
/// exclusion words.
pub fn is_relevant(hit: &SearchHit, profile: &SectorProfile) -> bool {
    let text = format!("{} {}", hit.name, hit.snippet).to_lowercase();
    !profile.exclusions.iter().any(|word| text.contains(word))
}

/// Keeps the first hit per link, preserving order.
pub fn dedupe_by_link(hits: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.link.clone()))
        .collect()
}

/// Runs every search term of the profile. A failing term is skipped; only
/// when every term fails is the last error returned.
async fn collect_candidates(
    search: &dyn LeadSearch,
    profile: &SectorProfile,
    region: &str,
) -> Result<Vec<SearchHit>, SearchError> {
    let mut candidates = Vec::new();
    let mut last_error = None;
    let mut any_succeeded = false;

    for term in profile.search_terms {
        let query = format!("{term} {region}");
        match search.search(&query, MAX_RESULTS).await {
            Ok(hits) => {
                any_succeeded = true;
                candidates.extend(hits.into_iter().filter(|h| is_relevant(h, profile)));
            }
            Err(e) => {
                warn!("Search for '{query}' failed: {e}");
                last_error = Some(e);
            }
        }
    }

    match (any_succeeded, last_error) {
        (false, Some(e)) => Err(e),
        _ => Ok(dedupe_by_link(candidates)),
    }
}

pub fn build_discovery_prompt(companies: &[SearchHit], sector: CompanyType, region: &str) -> String {
    let context: String = companies
        .iter()
        .map(|c| {
            format!(
                "Company: {}\nWebsite: {}\nInfo: {}\n\n",
                c.name, c.link, c.snippet
            )
        })
        .collect();

    DISCOVERY_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{language_instruction}", LANGUAGE_INSTRUCTION)
        .replace("{sector}", sector.display_name())
        // Search data and region are user text: neither may be expanded.
        // `{region}` comes before `{companies}` in the template.
        .replace("{companies}", context.trim_end())
        .replacen("{region}", region, 1)
}

/// Never fails: search and model errors become user-visible messages.
pub async fn discover(
    search: &dyn LeadSearch,
    llm: &dyn TextCompleter,
    sector: CompanyType,
    region: &str,
) -> DiscoveryOutcome {
    let profile = sector_profile(sector);
    let mut outcome = DiscoveryOutcome {
        sector,
        region: region.to_string(),
        companies: Vec::new(),
        analysis: None,
        message: None,
    };

    let companies = match collect_candidates(search, &profile, region).await {
        Ok(companies) => companies,
        Err(e) => {
            warn!("Discovery search failed for {sector:?} in {region}: {e}");
            outcome.message = Some(SEARCH_UNAVAILABLE_MESSAGE.to_string());
            return outcome;
        }
    };

    if companies.is_empty() {
        outcome.message = Some(NO_VALID_COMPANIES_MESSAGE.to_string());
        return outcome;
    }

    info!(
        "Discovery found {} companies for {sector:?} in {region}",
        companies.len()
    );

    let prompt = build_discovery_prompt(&companies, sector, region);
    let analysis = match llm.complete(DISCOVERY_SYSTEM, &prompt, ANALYSIS_TIMEOUT).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Discovery analysis failed, returning fallback: {e}");
            llm.fallback().to_string()
        }
    };

    outcome.companies = companies;
    outcome.analysis = Some(analysis);
    outcome
}
