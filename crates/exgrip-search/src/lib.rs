//! Text-to-image similarity ranking for exgrip.
//!
//! Downloads candidate images, embeds them and the query text into a shared
//! vision-language space, and ranks candidates by similarity to the text.
//! The download and embedding steps sit behind the [`ImageFetcher`] and
//! [`Embedder`] traits.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod embed;
pub mod error;
pub mod fetch;
pub mod rank;
pub mod similarity;

#[cfg(feature = "clip")]
pub use embed::ClipEmbedder;
pub use embed::Embedder;
pub use error::{SearchError, SearchResult};
pub use fetch::{FetchOptions, HttpImageFetcher, ImageFetcher};
pub use rank::{Candidate, Ranked, RankerOptions, SimilarityRanker};
