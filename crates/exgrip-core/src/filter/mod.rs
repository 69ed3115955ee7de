//! Conjunctive filters over catalog combinations.
//!
//! A [`CatalogQuery`] is turned into a [`Predicate`] by [`build_predicate`]:
//! every present field contributes one [`Comparison`], and the comparisons
//! are combined with AND. There is deliberately no OR or NOT.
//!
//! [`CatalogQuery`]: crate::model::CatalogQuery

pub mod builder;
pub mod length;
pub mod predicate;

pub use builder::{build_predicate, FilterBuilder};
pub use length::LengthRange;
pub use predicate::{Attribute, Comparison, Operand, Predicate};
