//! `POST /search`: rank vehicle images against a text query.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use exgrip_search::{Candidate, Embedder, HttpImageFetcher, SearchResult, SimilarityRanker};

use crate::config::Config;
use crate::error::ApiError;

/// One image to rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub vehicle_img_url: String,
    pub date_time: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub images: Vec<ImageData>,
}

/// A matched image, best first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMatch {
    pub id: String,
    pub date_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub results: Vec<ImageMatch>,
}

/// Shared state for the search router.
#[derive(Debug, Clone)]
pub struct SearchState {
    ranker: Arc<SimilarityRanker>,
}

impl SearchState {
    pub fn new(ranker: SimilarityRanker) -> Self {
        Self {
            ranker: Arc::new(ranker),
        }
    }

    /// Build the production ranker: HTTP fetcher plus the compiled-in
    /// embedding backend, loaded once.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or no embedding
    /// backend is available.
    pub fn from_config(config: &Config) -> SearchResult<Self> {
        let fetcher = HttpImageFetcher::new(&config.fetch_options())?;
        let embedder = load_embedder(config)?;
        Ok(Self::new(SimilarityRanker::new(
            Arc::new(fetcher),
            embedder,
            config.ranker_options(),
        )))
    }
}

#[cfg(feature = "clip")]
fn load_embedder(config: &Config) -> SearchResult<Arc<dyn Embedder>> {
    let embedder = exgrip_search::ClipEmbedder::load(config.model_cache_dir.clone())?;
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "clip"))]
fn load_embedder(_config: &Config) -> SearchResult<Arc<dyn Embedder>> {
    Err(exgrip_search::SearchError::Unavailable(
        "built without the `clip` feature".to_string(),
    ))
}

/// Build the search router. Cross-origin requests are allowed from any
/// origin.
pub fn router(state: SearchState) -> Router {
    Router::new()
        .route("/search", post(search_images))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Handler for POST /search
async fn search_images(
    State(state): State<SearchState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload?;

    log::info!(
        "Ranking {} images for query {:?}",
        request.images.len(),
        request.query
    );

    let candidates = request
        .images
        .into_iter()
        .map(|image| Candidate {
            url: image.vehicle_img_url,
            metadata: ImageMatch {
                id: image.id,
                date_time: image.date_time,
            },
        })
        .collect();

    let ranked = state.ranker.rank(&request.query, candidates).await?;

    Ok(Json(QueryResponse {
        results: ranked.into_iter().map(|r| r.metadata).collect(),
    }))
}
