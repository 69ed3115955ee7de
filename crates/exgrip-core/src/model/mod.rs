pub mod combination;
pub mod query;

pub use combination::{Combination, CombinationSummary};
pub use query::{CatalogQuery, ToolType};
