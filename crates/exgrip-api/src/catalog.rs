//! `POST /process-data/`: catalog lookup by mechanical attributes.

use std::sync::{Arc, Mutex};

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use exgrip_core::schema::Database;
use exgrip_core::{CatalogQuery, CombinationSummary};

use crate::error::ApiError;

/// Shared state for the catalog router.
#[derive(Debug, Clone)]
pub struct CatalogState {
    store: Arc<Mutex<Database>>,
}

impl CatalogState {
    pub fn new(db: Database) -> Self {
        Self {
            store: Arc::new(Mutex::new(db)),
        }
    }
}

/// Build the catalog router.
pub fn router(state: CatalogState) -> Router {
    Router::new()
        .route("/process-data/", post(process_data))
        .route("/process-data", post(process_data))
        .with_state(state)
}

/// Handler for POST /process-data/
async fn process_data(
    State(state): State<CatalogState>,
    payload: Result<Json<CatalogQuery>, JsonRejection>,
) -> Result<Json<Vec<CombinationSummary>>, ApiError> {
    let Json(query) = payload?;

    // SQLite work is blocking; keep it off the async workers.
    let results = tokio::task::spawn_blocking(move || {
        let db = state.store.lock().map_err(|_| {
            exgrip_core::Error::StoreUnavailable("catalog lock poisoned".to_string())
        })?;
        exgrip_core::lookup(&*db, &query)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    log::info!("Catalog lookup matched {} combinations", results.len());
    Ok(Json(results))
}
