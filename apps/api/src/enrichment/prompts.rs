// Prompt constants for the enrichment features.
// Reuses cross-cutting fragments from llm_client::prompts.

pub const SUMMARY_SYSTEM: &str =
    "You are a recruitment and sales analyst for the Dutch construction industry. \
    You analyse a tracked list of construction companies and advise who to call.";

/// Own-data summary prompt. Replace `{language_instruction}` and `{data}`
/// before sending; `{data}` is the canonical CSV export of the records.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"{language_instruction}

Analyse the company list below and give:
1. Who to call today, and why (at most five companies, highest demand first)
2. Which trades (work kinds) show the highest staffing demand
3. A short, concrete action plan for this week

Columns: score is a 0-100 demand estimate, priority is derived from it,
status is the current follow-up state.

DATA:
{data}"#;

pub const DISCOVERY_SYSTEM: &str =
    "You are a very critical recruitment analyst for the Dutch construction industry. \
    You only assess real companies that are given to you.";

/// Discovery analysis prompt. Replace `{grounding_instruction}`,
/// `{language_instruction}`, `{sector}`, `{region}` and `{companies}`.
pub const DISCOVERY_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

{language_instruction}

For EACH company give:
- Staffing demand score (0-100)
- Urgency (high / medium / low)
- Likely roles they need
- Who decides on hiring temporary staff (job title, never a name)
- Concrete advice for the first call

Sector: {sector}
Region: {region}

DATA:
{companies}"#;
