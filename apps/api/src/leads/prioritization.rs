//! Read-side views over the working copy of records. Nothing here mutates
//! or persists; every function returns a fresh ordered list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::company::{CallStatus, CompanyRecord, PriorityLabel};

pub const DEFAULT_FOLLOW_UP_DAYS: i64 = 14;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverviewGrouping {
    /// Status rank first (call today → done), then score descending.
    #[default]
    ByStatus,
    /// File order, as entered.
    Insertion,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewRow {
    #[serde(flatten)]
    pub record: CompanyRecord,
    pub follow_up_due: bool,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PrioritySummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub call_today: usize,
}

/// Records marked "call today", highest score first. Equal scores keep
/// their insertion order (`sort_by` is stable).
pub fn call_today(records: &[CompanyRecord]) -> Vec<CompanyRecord> {
    let mut selected: Vec<CompanyRecord> = records
        .iter()
        .filter(|r| r.status == CallStatus::CallToday)
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.score.cmp(&a.score));
    selected
}

pub fn full_overview(
    records: &[CompanyRecord],
    grouping: OverviewGrouping,
    today: NaiveDate,
    follow_up_days: i64,
) -> Vec<OverviewRow> {
    let mut ordered: Vec<&CompanyRecord> = records.iter().collect();

    if grouping == OverviewGrouping::ByStatus {
        ordered.sort_by(|a, b| {
            a.status
                .rank()
                .cmp(&b.status.rank())
                .then_with(|| b.score.cmp(&a.score))
        });
    }

    ordered
        .into_iter()
        .map(|record| OverviewRow {
            follow_up_due: follow_up_due(record, today, follow_up_days),
            record: record.clone(),
        })
        .collect()
}

/// True when an open lead has not been contacted for more than
/// `follow_up_days`. No recorded contact date means no warning.
pub fn follow_up_due(record: &CompanyRecord, today: NaiveDate, follow_up_days: i64) -> bool {
    if record.status == CallStatus::Done {
        return false;
    }
    match record.last_contact {
        Some(last) => (today - last).num_days() > follow_up_days,
        None => false,
    }
}

pub fn summarize_priorities(records: &[CompanyRecord]) -> PrioritySummary {
    records
        .iter()
        .fold(PrioritySummary::default(), |mut summary, record| {
            summary.total += 1;
            match record.priority {
                PriorityLabel::High => summary.high += 1,
                PriorityLabel::Medium => summary.medium += 1,
                PriorityLabel::Low => summary.low += 1,
            }
            if record.status == CallStatus::CallToday {
                summary.call_today += 1;
            }
            summary
        })
}
