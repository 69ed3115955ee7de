//! Ranking candidate images against a text query.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::embed::Embedder;
use crate::error::{SearchError, SearchResult};
use crate::fetch::ImageFetcher;
use crate::similarity::{cosine_similarity, LOGIT_SCALE};

/// An image to rank, with caller-owned metadata carried through.
#[derive(Debug, Clone)]
pub struct Candidate<M> {
    pub url: String,
    pub metadata: M,
}

/// A ranked candidate. Higher scores are more similar to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<M> {
    pub metadata: M,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct RankerOptions {
    /// Maximum number of results returned.
    pub top_k: usize,
    /// Upper bound on concurrent image downloads.
    pub max_concurrent_fetches: usize,
    /// Leave out images that fail to download or embed instead of failing
    /// the whole ranking.
    pub skip_failed: bool,
}

impl Default for RankerOptions {
    fn default() -> Self {
        Self {
            top_k: 5,
            max_concurrent_fetches: 8,
            skip_failed: false,
        }
    }
}

/// Ranks images by similarity to a text query.
///
/// All downloads finish (or the ranking fails) before any scoring starts,
/// so a request never yields partial rankings. Ties keep input order.
pub struct SimilarityRanker {
    fetcher: Arc<dyn ImageFetcher>,
    embedder: Arc<dyn Embedder>,
    options: RankerOptions,
}

impl fmt::Debug for SimilarityRanker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimilarityRanker")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl SimilarityRanker {
    pub fn new(
        fetcher: Arc<dyn ImageFetcher>,
        embedder: Arc<dyn Embedder>,
        options: RankerOptions,
    ) -> Self {
        Self {
            fetcher,
            embedder,
            options,
        }
    }

    /// Rank `candidates` against `query` and keep the best `top_k`.
    ///
    /// # Errors
    /// Unless `skip_failed` is set, the first download or embedding failure
    /// fails the whole ranking. A failure to embed the query text always
    /// does.
    pub async fn rank<M: Send>(
        &self,
        query: &str,
        candidates: Vec<Candidate<M>>,
    ) -> SearchResult<Vec<Ranked<M>>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let urls = candidates.iter().map(|c| c.url.clone()).collect();
        let images = self.fetch_all(urls).await?;

        let embedder = Arc::clone(&self.embedder);
        let query = query.to_string();
        let skip_failed = self.options.skip_failed;
        let scores = tokio::task::spawn_blocking(move || {
            score_all(embedder.as_ref(), &query, &images, skip_failed)
        })
        .await
        .map_err(|e| SearchError::Task(e.to_string()))??;

        let mut ranked: Vec<Ranked<M>> = candidates
            .into_iter()
            .zip(scores)
            .filter_map(|(candidate, score)| {
                score.map(|score| Ranked {
                    metadata: candidate.metadata,
                    score,
                })
            })
            .collect();

        // Stable, so equal scores keep input order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(self.options.top_k);
        Ok(ranked)
    }

    /// Download every image, at most `max_concurrent_fetches` at a time.
    ///
    /// The result is aligned with `urls`; `None` marks a skipped failure.
    async fn fetch_all(&self, urls: Vec<String>) -> SearchResult<Vec<Option<Vec<u8>>>> {
        let permits = Arc::new(Semaphore::new(self.options.max_concurrent_fetches.max(1)));
        let mut images = vec![None; urls.len()];
        let mut tasks = JoinSet::new();

        for (index, url) in urls.into_iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let permits = Arc::clone(&permits);
            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => fetcher.fetch(&url).await,
                    Err(e) => Err(SearchError::Task(e.to_string())),
                };
                (index, url, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (index, url, result) = joined.map_err(|e| SearchError::Task(e.to_string()))?;
            match result {
                Ok(bytes) => images[index] = Some(bytes),
                Err(err) if self.options.skip_failed => {
                    log::warn!("Skipping image {}: {}", url, err);
                }
                Err(err) => {
                    log::error!("Fetching {} failed: {}", url, err);
                    return Err(err);
                }
            }
        }

        Ok(images)
    }
}

/// Score each downloaded image against the query text.
fn score_all(
    embedder: &dyn Embedder,
    query: &str,
    images: &[Option<Vec<u8>>],
    skip_failed: bool,
) -> SearchResult<Vec<Option<f32>>> {
    let text = embedder.embed_text(query)?;

    images
        .iter()
        .enumerate()
        .map(|(index, image)| {
            let Some(bytes) = image else {
                return Ok(None);
            };
            match embedder
                .embed_image(bytes)
                .and_then(|embedding| score(&text, &embedding))
            {
                Ok(score) => Ok(Some(score)),
                Err(err) if skip_failed => {
                    log::warn!("Skipping image #{}: {}", index, err);
                    Ok(None)
                }
                Err(err) => Err(err),
            }
        })
        .collect()
}

fn score(text: &[f32], image: &[f32]) -> SearchResult<f32> {
    if text.len() != image.len() {
        return Err(SearchError::DimensionMismatch {
            text: text.len(),
            image: image.len(),
        });
    }
    Ok(LOGIT_SCALE * cosine_similarity(text, image))
}
