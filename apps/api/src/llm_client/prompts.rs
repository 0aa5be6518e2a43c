// Shared prompt fragments. Each feature that calls the model keeps its own
// prompts.rs next to it; only cross-cutting pieces live here.

/// Leads are Dutch companies and the sales team works in Dutch.
pub const LANGUAGE_INSTRUCTION: &str = "Write your answer in Dutch. \
    Keep it short and practical; the reader is about to pick up the phone.";

/// Appended to every prompt that embeds company data.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use ONLY the companies and facts provided in DATA below. \
    Do NOT invent companies, people, phone numbers or figures. \
    If the data does not support a statement, leave it out.";
