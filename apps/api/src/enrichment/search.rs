//! Web search boundary. Search results are used for discovery only and are
//! never written to the record store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const GOOGLE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
/// Custom Search returns at most 10 items per request.
pub const MAX_RESULTS: u32 = 10;
const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub name: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Search credentials (GOOGLE_API_KEY / GOOGLE_CX) are not configured")]
    MissingCredentials,
}

/// Carried in `AppState` as `Arc<dyn LeadSearch>`.
#[async_trait]
pub trait LeadSearch: Send + Sync {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError>;

    /// Whether credentials are present. Informational only.
    fn is_configured(&self) -> bool;
}

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(default)]
    items: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

impl From<GoogleItem> for SearchHit {
    fn from(item: GoogleItem) -> Self {
        SearchHit {
            name: item.title,
            link: item.link,
            snippet: item.snippet,
        }
    }
}

/// Google Programmable Search (Custom Search JSON API) client.
#[derive(Clone)]
pub struct GoogleSearchClient {
    client: Client,
    api_key: Option<String>,
    cx: Option<String>,
    endpoint: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: Option<String>, cx: Option<String>) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder().timeout(SEARCH_TIMEOUT).build()?,
            api_key,
            cx,
            endpoint: GOOGLE_SEARCH_URL.to_string(),
        })
    }
}

#[async_trait]
impl LeadSearch for GoogleSearchClient {
    async fn search(&self, query: &str, max_results: u32) -> Result<Vec<SearchHit>, SearchError> {
        let (Some(key), Some(cx)) = (self.api_key.as_deref(), self.cx.as_deref()) else {
            return Err(SearchError::MissingCredentials);
        };

        let num = max_results.clamp(1, MAX_RESULTS).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", key), ("cx", cx), ("q", query), ("num", num.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GoogleResponse = response.json().await?;
        let hits = parse_items(body);
        debug!("Search '{query}' returned {} hits", hits.len());
        Ok(hits)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.cx.is_some()
    }
}

/// Items without a link cannot be de-duplicated or visited, so they are dropped.
fn parse_items(body: GoogleResponse) -> Vec<SearchHit> {
    body.items
        .into_iter()
        .filter(|item| !item.link.trim().is_empty())
        .map(SearchHit::from)
        .collect()
}
