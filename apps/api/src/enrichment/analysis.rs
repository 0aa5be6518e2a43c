use std::time::Duration;

use tracing::{info, warn};

use crate::enrichment::prompts::{SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::llm_client::prompts::LANGUAGE_INSTRUCTION;
use crate::llm_client::TextCompleter;
use crate::models::company::CompanyRecord;
use crate::store::render_csv;

/// At most this many records are embedded in one summary prompt.
pub const SUMMARY_RECORD_LIMIT: usize = 50;
pub const SUMMARY_TIMEOUT: Duration = Duration::from_secs(30);
pub const NO_DATA_MESSAGE: &str = "No data yet. Add a company first.";

pub fn build_summary_prompt(records: &[CompanyRecord]) -> Option<String> {
    let limited = &records[..records.len().min(SUMMARY_RECORD_LIMIT)];
    let data = match render_csv(limited) {
        Ok(data) => data,
        Err(e) => {
            warn!("Could not render records for summary prompt: {e}");
            return None;
        }
    };

    Some(
        SUMMARY_PROMPT_TEMPLATE
            .replace("{language_instruction}", LANGUAGE_INSTRUCTION)
            .replace("{data}", &data),
    )
}

/// Asks the model for a call plan over the stored records. Never fails:
/// every error degrades to the completer's fallback text.
pub async fn summarize(records: &[CompanyRecord], llm: &dyn TextCompleter) -> String {
    if records.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let Some(prompt) = build_summary_prompt(records) else {
        return llm.fallback().to_string();
    };

    info!(
        "Requesting summary for {} records",
        records.len().min(SUMMARY_RECORD_LIMIT)
    );

    match llm.complete(SUMMARY_SYSTEM, &prompt, SUMMARY_TIMEOUT).await {
        Ok(text) => text,
        Err(e) => {
            warn!("Summary failed, returning fallback: {e}");
            llm.fallback().to_string()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{StubCompleter, TEST_FALLBACK};
    use super::*;
    use crate::leads::intake::{build_record, NewCompany};
    use crate::leads::scoring::ScoringConfig;
    use crate::models::company::{CallStatus, CompanyType, ProjectPhase, WorkKind};
    use chrono::NaiveDate;

    fn records(n: usize) -> Vec<CompanyRecord> {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        (0..n)
            .map(|i| {
                build_record(
                    NewCompany {
                        name: format!("Bedrijf {i}"),
                        company_type: CompanyType::Finishing,
                        work_kind: WorkKind::Carpentry,
                        project_count: 2,
                        vacancies_active: false,
                        project_phase: ProjectPhase::Start,
                        status: CallStatus::ThisWeek,
                        last_contact: None,
                        next_action: None,
                        note: None,
                    },
                    &ScoringConfig::default(),
                    today,
                )
                .unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_empty_records_skip_the_model() {
        let llm = StubCompleter::answering("unused");
        let text = summarize(&[], &llm).await;
        assert_eq!(text, NO_DATA_MESSAGE);
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_summary_returns_model_text() {
        let llm = StubCompleter::answering("Bel Bedrijf 0.");
        let text = summarize(&records(2), &llm).await;
        assert_eq!(text, "Bel Bedrijf 0.");
        let prompt = llm.last_prompt().unwrap();
        assert!(prompt.contains("Bedrijf 1"));
        assert!(prompt.contains("DATA:"));
    }

    #[tokio::test]
    async fn test_failure_degrades_to_fallback() {
        let llm = StubCompleter::failing();
        let text = summarize(&records(1), &llm).await;
        assert_eq!(text, TEST_FALLBACK);
    }

    #[test]
    fn test_prompt_caps_record_count() {
        let prompt = build_summary_prompt(&records(60)).unwrap();
        assert!(prompt.contains("Bedrijf 49,"));
        assert!(!prompt.contains("Bedrijf 50,"));
    }
}
