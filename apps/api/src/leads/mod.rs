// Lead tracking core: intake, scoring, prioritization.
// Scoring and prioritization are pure; only handlers and worklist touch the store.

pub mod handlers;
pub mod intake;
pub mod prioritization;
pub mod scoring;
pub mod worklist;
