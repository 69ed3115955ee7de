//! Embedding backends.
//!
//! An [`Embedder`] maps text and images into the same vector space so they
//! can be compared directly. The model is loaded once at startup and then
//! shared read-only between requests.

use crate::error::SearchResult;

/// A joint text / image embedding model.
///
/// Implementations are CPU-bound and are called from the blocking pool.
pub trait Embedder: Send + Sync {
    fn embed_text(&self, text: &str) -> SearchResult<Vec<f32>>;

    /// Embed an encoded image (JPEG, PNG, ...).
    fn embed_image(&self, image: &[u8]) -> SearchResult<Vec<f32>>;
}

#[cfg(feature = "clip")]
pub use clip::ClipEmbedder;

#[cfg(feature = "clip")]
mod clip {
    use std::fmt;
    use std::path::PathBuf;

    use fastembed::{
        EmbeddingModel, ImageEmbedding, ImageEmbeddingModel, ImageInitOptions, InitOptions,
        TextEmbedding,
    };

    use super::Embedder;
    use crate::error::{SearchError, SearchResult};

    /// CLIP ViT-B/32 text and vision encoders, run locally through ONNX.
    pub struct ClipEmbedder {
        text: TextEmbedding,
        vision: ImageEmbedding,
    }

    impl ClipEmbedder {
        /// Load both encoders, downloading them into `cache_dir` on first
        /// use.
        ///
        /// # Errors
        /// Returns [`SearchError::Unavailable`] if either model fails to
        /// load.
        pub fn load(cache_dir: Option<PathBuf>) -> SearchResult<Self> {
            let mut text_options = InitOptions::new(EmbeddingModel::ClipVitB32);
            let mut vision_options = ImageInitOptions::new(ImageEmbeddingModel::ClipVitB32);
            if let Some(dir) = cache_dir {
                text_options = text_options.with_cache_dir(dir.clone());
                vision_options = vision_options.with_cache_dir(dir);
            }

            let text = TextEmbedding::try_new(text_options)
                .map_err(|e| SearchError::Unavailable(format!("CLIP text encoder: {e}")))?;
            let vision = ImageEmbedding::try_new(vision_options)
                .map_err(|e| SearchError::Unavailable(format!("CLIP vision encoder: {e}")))?;

            log::info!("Loaded CLIP ViT-B/32 text and vision encoders");
            Ok(Self { text, vision })
        }
    }

    impl fmt::Debug for ClipEmbedder {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ClipEmbedder")
                .field("model", &"ViT-B/32")
                .finish_non_exhaustive()
        }
    }

    fn first(embeddings: Vec<Vec<f32>>) -> SearchResult<Vec<f32>> {
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::Embedding("model returned no embedding".to_string()))
    }

    impl Embedder for ClipEmbedder {
        fn embed_text(&self, text: &str) -> SearchResult<Vec<f32>> {
            let embeddings = self
                .text
                .embed(vec![text], None)
                .map_err(|e| SearchError::Embedding(e.to_string()))?;
            first(embeddings)
        }

        fn embed_image(&self, image: &[u8]) -> SearchResult<Vec<f32>> {
            let embeddings = self
                .vision
                .embed_bytes(&[image], None)
                .map_err(|e| SearchError::Embedding(e.to_string()))?;
            first(embeddings)
        }
    }
}

#[cfg(all(test, feature = "clip"))]
mod tests {
    use super::*;

    fn assert_shared<T: Send + Sync>() {}

    #[test]
    fn test_clip_embedder_is_shared_across_requests() {
        assert_shared::<ClipEmbedder>();
    }
}
