//! Core catalog logic for exgrip.
//!
//! This crate defines the catalog query and combination records, the filter
//! builder that turns a query into a conjunctive [`Predicate`], the length
//! range grammar, and the SQLite-backed combination store.
//!
//! [`Predicate`]: filter::Predicate

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod filter;
pub mod model;
pub mod schema;

pub use catalog::{lookup, CatalogStore};
pub use error::{Error, Result};
pub use filter::{build_predicate, Attribute, Comparison, LengthRange, Operand, Predicate};
pub use model::{CatalogQuery, Combination, CombinationSummary, ToolType};
