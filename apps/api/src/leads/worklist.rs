use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::errors::AppError;
use crate::models::company::CompanyRecord;
use crate::state::AppState;

/// Request-scoped working copy of the record store. Loaded at the start of a
/// handler and dropped with the response; nothing survives between requests.
#[derive(Debug, Clone)]
pub struct Worklist {
    pub records: Vec<CompanyRecord>,
    pub today: NaiveDate,
}

impl Worklist {
    pub async fn load(state: &AppState) -> Result<Self, AppError> {
        let store = Arc::clone(&state.store);
        let records = tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

        Ok(Self {
            records,
            today: Local::now().date_naive(),
        })
    }
}

/// Persists one record on the blocking pool.
pub async fn append_record(state: &AppState, record: CompanyRecord) -> Result<(), AppError> {
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || store.append(record))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;
    Ok(())
}
