pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::enrichment::handlers as enrichment;
use crate::leads::handlers as leads;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Worklist
        .route(
            "/api/v1/companies",
            get(leads::handle_overview).post(leads::handle_create_company),
        )
        .route("/api/v1/companies/call-today", get(leads::handle_call_today))
        // Enrichment
        .route("/api/v1/analysis", post(enrichment::handle_analysis))
        .route("/api/v1/discovery/sectors", get(enrichment::handle_sectors))
        .route("/api/v1/discovery", post(enrichment::handle_discovery))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::enrichment::analysis::test_support::StubCompleter;
    use crate::enrichment::search::{LeadSearch, SearchError, SearchHit};
    use crate::leads::scoring::ScoringConfig;
    use crate::store::CsvRecordStore;

    struct OfflineSearch;

    #[async_trait]
    impl LeadSearch for OfflineSearch {
        async fn search(&self, _query: &str, _max: u32) -> Result<Vec<SearchHit>, SearchError> {
            Err(SearchError::MissingCredentials)
        }

        fn is_configured(&self) -> bool {
            false
        }
    }

    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let data_file = dir.path().join("data.csv");
        let scoring = ScoringConfig::default();
        AppState {
            store: Arc::new(CsvRecordStore::new(&data_file, scoring.clone())),
            scoring: Arc::new(scoring),
            llm: Arc::new(StubCompleter::answering("Bel vandaag Jansen Bouw.")),
            search: Arc::new(OfflineSearch),
            config: Config {
                data_file,
                port: 0,
                rust_log: "debug".to_string(),
                openai_api_key: None,
                openai_base_url: crate::llm_client::DEFAULT_BASE_URL.to_string(),
                google_api_key: None,
                google_cx: None,
                scoring_config: None,
                follow_up_days: 14,
            },
        }
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn company(name: &str, projects: i64, status: &str) -> Value {
        json!({
            "name": name,
            "company_type": "subcontractor",
            "work_kind": "concrete_shell",
            "project_count": projects,
            "vacancies_active": true,
            "project_phase": "peak",
            "status": status
        })
    }

    #[tokio::test]
    async fn test_health_reports_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(build_router(test_state(&dir)), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["credentials"]["language_model"], true);
        assert_eq!(body["credentials"]["web_search"], false);
    }

    #[tokio::test]
    async fn test_empty_store_gives_placeholder_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let (status, body) =
            send(build_router(state.clone()), "GET", "/api/v1/companies/call-today", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["companies"], json!([]));
        assert_eq!(body["message"], leads::NO_COMPANIES_MESSAGE);

        let (status, body) = send(build_router(state), "GET", "/api/v1/companies", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["companies"], json!([]));
        assert_eq!(body["summary"]["total"], 0);
    }

    #[tokio::test]
    async fn test_create_scores_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let (status, body) = send(
            build_router(state.clone()),
            "POST",
            "/api/v1/companies",
            Some(company("Jansen Bouw", 3, "call_today")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["company"]["score"], 65);
        assert_eq!(body["company"]["priority"], "medium");
        assert_eq!(body["message"], "Saved (score 65%)");

        let stored = state.store.load().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "Jansen Bouw");
    }

    #[tokio::test]
    async fn test_empty_name_rejected_and_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        let (status, body) = send(
            build_router(state.clone()),
            "POST",
            "/api/v1/companies",
            Some(company("   ", 3, "later")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("name is required"));
        assert!(!state.store.path().exists());
    }

    #[tokio::test]
    async fn test_call_today_sorted_by_score() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        for (name, projects, status) in [
            ("Low", 0, "call_today"),
            ("Elsewhere", 10, "this_week"),
            ("High", 8, "call_today"),
        ] {
            let (code, _) = send(
                build_router(state.clone()),
                "POST",
                "/api/v1/companies",
                Some(company(name, projects, status)),
            )
            .await;
            assert_eq!(code, StatusCode::CREATED);
        }

        let (status, body) =
            send(build_router(state), "GET", "/api/v1/companies/call-today", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["companies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["High", "Low"]);
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_overview_insertion_grouping() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);

        for (name, status) in [("Done first", "done"), ("Call second", "call_today")] {
            send(
                build_router(state.clone()),
                "POST",
                "/api/v1/companies",
                Some(company(name, 2, status)),
            )
            .await;
        }

        let (_, grouped) = send(build_router(state.clone()), "GET", "/api/v1/companies", None).await;
        assert_eq!(grouped["companies"][0]["name"], "Call second");
        assert_eq!(grouped["companies"][0]["follow_up_due"], false);
        assert_eq!(grouped["summary"]["call_today"], 1);

        let (_, inserted) = send(
            build_router(state),
            "GET",
            "/api/v1/companies?grouping=insertion",
            None,
        )
        .await;
        assert_eq!(inserted["companies"][0]["name"], "Done first");
    }

    #[tokio::test]
    async fn test_analysis_uses_completer() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        send(
            build_router(state.clone()),
            "POST",
            "/api/v1/companies",
            Some(company("Jansen Bouw", 3, "call_today")),
        )
        .await;

        let (status, body) = send(build_router(state), "POST", "/api/v1/analysis", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"], "Bel vandaag Jansen Bouw.");
        assert_eq!(body["records_analysed"], 1);
    }

    #[tokio::test]
    async fn test_discovery_degrades_when_search_offline() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(
            build_router(test_state(&dir)),
            "POST",
            "/api/v1/discovery",
            Some(json!({"sector": "prefab_concrete_producer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["region"], "Nederland");
        assert_eq!(body["companies"], json!([]));
        assert_eq!(
            body["message"],
            crate::enrichment::discovery::SEARCH_UNAVAILABLE_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_sectors_listing() {
        let dir = tempfile::tempdir().unwrap();
        let (status, body) = send(
            build_router(test_state(&dir)),
            "GET",
            "/api/v1/discovery/sectors",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sectors"].as_array().unwrap().len(), 6);
        assert_eq!(body["regions"][0], "Nederland");
    }
}
