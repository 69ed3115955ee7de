pub mod config;
pub mod import;
pub mod query;
pub mod serve;

pub use import::run_import;
pub use query::{run_query, QueryArgs};
pub use serve::{serve_all, serve_catalog, serve_search};
