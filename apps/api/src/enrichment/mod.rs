// Optional enrichment: AI summaries of the stored records and web-search
// driven discovery of new leads. All external failures degrade to text.

pub mod analysis;
pub mod discovery;
pub mod handlers;
pub mod prompts;
pub mod search;
pub mod sectors;
