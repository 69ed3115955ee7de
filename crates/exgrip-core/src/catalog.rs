//! Catalog lookups: query in, matched combinations out.

use crate::error::{Error, Result};
use crate::filter::{build_predicate, Predicate};
use crate::model::{CatalogQuery, Combination, CombinationSummary};

/// A backing store able to scan combinations with a filter.
///
/// Results carry no ordering guarantee and are not paginated.
pub trait CatalogStore {
    fn scan(&self, predicate: &Predicate) -> Result<Vec<Combination>>;
}

/// Run a catalog lookup against a store.
///
/// # Errors
/// - [`Error::NoCriteria`] / [`Error::MalformedLength`] when the query
///   cannot be turned into a predicate.
/// - [`Error::NoMatches`] when the scan returns nothing.
/// - Any store error, unchanged.
pub fn lookup<S>(store: &S, query: &CatalogQuery) -> Result<Vec<CombinationSummary>>
where
    S: CatalogStore + ?Sized,
{
    let predicate = build_predicate(query)?;
    let combinations = store.scan(&predicate)?;

    if combinations.is_empty() {
        return Err(Error::NoMatches);
    }

    Ok(combinations.iter().map(Combination::summary).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Comparison;
    use std::cell::RefCell;

    /// Records the predicates it was asked to scan and returns canned rows.
    struct RecordingStore {
        rows: Vec<Combination>,
        seen: RefCell<Vec<Predicate>>,
    }

    impl RecordingStore {
        fn new(rows: Vec<Combination>) -> Self {
            Self {
                rows,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CatalogStore for RecordingStore {
        fn scan(&self, predicate: &Predicate) -> Result<Vec<Combination>> {
            self.seen.borrow_mut().push(predicate.clone());
            Ok(self.rows.clone())
        }
    }

    struct FailingStore;

    impl CatalogStore for FailingStore {
        fn scan(&self, _predicate: &Predicate) -> Result<Vec<Combination>> {
            Err(Error::StoreUnavailable("connection lost".to_string()))
        }
    }

    fn spindle(value: &str) -> CatalogQuery {
        CatalogQuery {
            spindle: Some(value.to_string()),
            ..CatalogQuery::default()
        }
    }

    #[test]
    fn test_lookup_projects_summaries() {
        let mut row = Combination::new("1");
        row.master_holder_sku = Some("MH-1".to_string());
        row.holder_angle = Some("0".to_string());
        let store = RecordingStore::new(vec![row]);

        let results = lookup(&store, &spindle("A")).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].holder_sku.as_deref(), Some("MH-1"));
        assert_eq!(results[0].holder_angle.as_deref(), Some("0"));

        let seen = store.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(matches!(
            seen[0].comparisons(),
            [Comparison::Equals { .. }]
        ));
    }

    #[test]
    fn test_no_criteria_never_reaches_the_store() {
        let store = RecordingStore::new(Vec::new());
        let err = lookup(&store, &CatalogQuery::default()).unwrap_err();
        assert!(matches!(err, Error::NoCriteria));
        assert!(store.seen.borrow().is_empty());
    }

    #[test]
    fn test_empty_scan_is_not_found() {
        let store = RecordingStore::new(Vec::new());
        let err = lookup(&store, &spindle("A")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_errors_pass_through() {
        let err = lookup(&FailingStore, &spindle("A")).unwrap_err();
        assert!(matches!(err, Error::StoreUnavailable(_)));
    }
}
