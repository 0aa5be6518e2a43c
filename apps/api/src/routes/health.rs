use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and which external
/// credentials are present. The flags are informational; nothing is gated on them.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "leadradar",
        "credentials": {
            "language_model": state.llm.is_configured(),
            "web_search": state.search.is_configured()
        }
    }))
}
