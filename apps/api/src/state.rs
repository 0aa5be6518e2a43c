use std::sync::Arc;

use crate::config::Config;
use crate::enrichment::search::LeadSearch;
use crate::leads::scoring::ScoringConfig;
use crate::llm_client::TextCompleter;
use crate::store::CsvRecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no records: each request loads its own working copy.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CsvRecordStore>,
    pub scoring: Arc<ScoringConfig>,
    /// Completion backend. Default: `LlmClient`; tests swap in a stub.
    pub llm: Arc<dyn TextCompleter>,
    /// Web search backend. Default: `GoogleSearchClient`.
    pub search: Arc<dyn LeadSearch>,
    pub config: Config,
}
