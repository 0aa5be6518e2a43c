use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::leads::prioritization::DEFAULT_FOLLOW_UP_DAYS;
use crate::llm_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
/// Credentials are optional: without them the enrichment features answer
/// with their fallback text, everything else keeps working.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub port: u16,
    pub rust_log: String,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub google_api_key: Option<String>,
    pub google_cx: Option<String>,
    pub scoring_config: Option<PathBuf>,
    pub follow_up_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            data_file: optional_env("DATA_FILE")
                .unwrap_or_else(|| "data.csv".to_string())
                .into(),
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            openai_base_url: optional_env("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            google_api_key: optional_env("GOOGLE_API_KEY"),
            google_cx: optional_env("GOOGLE_CX"),
            scoring_config: optional_env("SCORING_CONFIG").map(PathBuf::from),
            follow_up_days: parse_follow_up_days(optional_env("FOLLOW_UP_DAYS"))?,
        })
    }
}

fn parse_follow_up_days(raw: Option<String>) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_FOLLOW_UP_DAYS);
    };
    let days = raw
        .parse::<u32>()
        .context("FOLLOW_UP_DAYS must be a non-negative whole number of days")?;
    Ok(i64::from(days))
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
