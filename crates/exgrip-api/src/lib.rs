//! HTTP surface for the exgrip services.
//!
//! Two independent axum routers: the catalog lookup (`POST /process-data/`)
//! and the image similarity search (`POST /search`). Both are stateless
//! per request; the catalog store and the embedding model are shared
//! read-only through router state.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod search;
pub mod server;

pub use config::Config;
pub use error::ApiError;
