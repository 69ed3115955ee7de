use rusqlite::types::Value;
use rusqlite::Connection;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::catalog::CatalogStore;
use crate::error::{Error, Result};
use crate::filter::{Comparison, Operand, Predicate};
use crate::model::Combination;

use super::migrations::MIGRATIONS;

const COLUMNS: &str = "id, spindle, length, holder_angle, extension_angle,
    bore_diameter, cutting_diameter, edge_radius, thread,
    master_holder_sku, extension_adapter_sku, clamping_extension_sku";

/// A database connection holding the combination catalog.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) a database at the given path and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    #[cfg(test)]
    const fn conn(&self) -> &Connection {
        &self.conn
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        let mut stmt = self
            .conn
            .prepare("SELECT version FROM schema_migrations ORDER BY version")?;
        let applied: Vec<u32> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for migration in MIGRATIONS {
            if !applied.contains(&migration.version) {
                log::info!(
                    "Applying migration {} ({})",
                    migration.version,
                    migration.name
                );
                self.conn.execute_batch(migration.sql)?;
                self.conn.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    rusqlite::params![migration.version, migration.name],
                )?;
            }
        }

        Ok(())
    }
}

// Combination CRUD
impl Database {
    /// Insert a combination, replacing any existing row with the same id.
    pub fn insert_combination(&self, combination: &Combination) -> Result<()> {
        insert(&self.conn, combination)
    }

    /// Insert many combinations in one transaction.
    ///
    /// Returns the number of rows written.
    pub fn insert_combinations(&mut self, combinations: &[Combination]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for combination in combinations {
            insert(&tx, combination)?;
        }
        tx.commit()?;
        Ok(combinations.len())
    }

    /// Load a JSON array of combinations from a catalog export file.
    pub fn import_json(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let combinations: Vec<Combination> = serde_json::from_reader(reader)?;
        let count = self.insert_combinations(&combinations)?;
        log::info!("Imported {} combinations from {}", count, path.display());
        Ok(count)
    }

    pub fn count_combinations(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM combinations", [], |row| row.get(0))?;
        row_count(count)
    }

    /// All combinations satisfying the predicate, in insertion order.
    pub fn scan_combinations(&self, predicate: &Predicate) -> Result<Vec<Combination>> {
        let (clause, params) = where_clause(predicate);
        let sql = format!("SELECT {COLUMNS} FROM combinations WHERE {clause} ORDER BY rowid");

        let mut stmt = self.conn.prepare(&sql)?;
        let combinations = stmt
            .query_map(rusqlite::params_from_iter(params.iter()), row_to_combination)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        log::debug!(
            "Scan [{}] matched {} combinations",
            predicate,
            combinations.len()
        );
        Ok(combinations)
    }
}

impl CatalogStore for Database {
    fn scan(&self, predicate: &Predicate) -> Result<Vec<Combination>> {
        self.scan_combinations(predicate)
    }
}

fn insert(conn: &Connection, combination: &Combination) -> Result<()> {
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO combinations ({COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ),
        rusqlite::params![
            combination.id,
            combination.spindle,
            combination.length,
            combination.holder_angle,
            combination.extension_angle,
            combination.bore_diameter,
            combination.cutting_diameter,
            combination.edge_radius,
            combination.thread,
            combination.master_holder_sku,
            combination.extension_adapter_sku,
            combination.clamping_extension_sku,
        ],
    )?;
    Ok(())
}

/// Compile a predicate into a parameterised `WHERE` clause.
///
/// Column names come from [`Attribute::column`], never from user input.
/// An absent operand binds `NULL`, and `column = NULL` is never true.
///
/// [`Attribute::column`]: crate::filter::Attribute::column
fn where_clause(predicate: &Predicate) -> (String, Vec<Value>) {
    let mut clauses = Vec::with_capacity(predicate.comparisons().len());
    let mut params = Vec::new();

    for comparison in predicate.comparisons() {
        let column = comparison.attribute().column();
        match comparison {
            Comparison::Equals { value, .. } => {
                clauses.push(format!("{column} = ?"));
                params.push(match value {
                    Operand::Text(s) => Value::Text(s.clone()),
                    Operand::Integer(n) => Value::Integer(*n),
                    Operand::Absent => Value::Null,
                });
            }
            Comparison::LessOrEqual { bound, .. } => {
                clauses.push(format!("{column} <= ?"));
                params.push(Value::Integer(*bound));
            }
            Comparison::GreaterThan { bound, .. } => {
                clauses.push(format!("{column} > ?"));
                params.push(Value::Integer(*bound));
            }
            Comparison::Between { low, high, .. } => {
                clauses.push(format!("{column} BETWEEN ? AND ?"));
                params.push(Value::Integer(*low));
                params.push(Value::Integer(*high));
            }
        }
    }

    (clauses.join(" AND "), params)
}

fn row_to_combination(row: &rusqlite::Row) -> rusqlite::Result<Combination> {
    Ok(Combination {
        id: row.get(0)?,
        spindle: row.get(1)?,
        length: row.get(2)?,
        holder_angle: row.get(3)?,
        extension_angle: row.get(4)?,
        bore_diameter: row.get(5)?,
        cutting_diameter: row.get(6)?,
        edge_radius: row.get(7)?,
        thread: row.get(8)?,
        master_holder_sku: row.get(9)?,
        extension_adapter_sku: row.get(10)?,
        clamping_extension_sku: row.get(11)?,
    })
}

fn row_count(count: i64) -> Result<usize> {
    usize::try_from(count).map_err(|_| Error::InvalidData(format!("row count {count} is negative")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{build_predicate, Attribute};
    use crate::model::CatalogQuery;
    use std::io::Write;

    fn combination(id: &str, spindle: &str, length: i64) -> Combination {
        let mut c = Combination::new(id);
        c.spindle = Some(spindle.to_string());
        c.length = Some(length);
        c
    }

    fn seeded() -> Database {
        let db = Database::open_in_memory().unwrap();
        for c in [
            combination("a-150", "A", 150),
            combination("a-200", "A", 200),
            combination("a-240", "A", 240),
            combination("b-180", "B", 180),
            combination("a-700", "A", 700),
        ] {
            db.insert_combination(&c).unwrap();
        }
        db
    }

    fn ids(combinations: &[Combination]) -> Vec<&str> {
        combinations.iter().map(|c| c.id.as_str()).collect()
    }

    fn scan(db: &Database, query: &CatalogQuery) -> Vec<Combination> {
        db.scan(&build_predicate(query).unwrap()).unwrap()
    }

    #[test]
    fn test_negative_row_count_is_invalid() {
        assert_eq!(row_count(3).unwrap(), 3);
        assert!(matches!(row_count(-1), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_database_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(db.count_combinations().unwrap(), 0);
    }

    #[test]
    fn test_reopen_does_not_reapply_migrations() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        Database::open(&path)
            .unwrap()
            .insert_combination(&combination("x", "A", 1))
            .unwrap();
        let db = Database::open(&path).unwrap();

        assert_eq!(db.count_combinations().unwrap(), 1);
    }

    #[test]
    fn test_combination_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let mut c = combination("rt", "HSK-A63", 180);
        c.holder_angle = Some("15".to_string());
        c.thread = Some("M10".to_string());
        c.master_holder_sku = Some("MH-1".to_string());
        db.insert_combination(&c).unwrap();

        let predicate = build_predicate(&CatalogQuery {
            spindle: Some("HSK-A63".to_string()),
            ..CatalogQuery::default()
        })
        .unwrap();
        assert_eq!(db.scan(&predicate).unwrap(), vec![c]);
    }

    #[test]
    fn test_spindle_and_length_scan() {
        let db = seeded();
        let found = scan(
            &db,
            &CatalogQuery {
                spindle: Some("A".to_string()),
                length: Some("<=200".to_string()),
                ..CatalogQuery::default()
            },
        );
        assert_eq!(ids(&found), ["a-150", "a-200"]);
    }

    #[test]
    fn test_length_forms_scan() {
        let db = seeded();
        let length = |expr: &str| CatalogQuery {
            length: Some(expr.to_string()),
            ..CatalogQuery::default()
        };

        assert_eq!(ids(&scan(&db, &length("180-240"))), ["a-200", "a-240", "b-180"]);
        assert_eq!(ids(&scan(&db, &length(">600"))), ["a-700"]);
        assert_eq!(ids(&scan(&db, &length("240"))), ["a-240"]);
        assert!(scan(&db, &length("240-180")).is_empty());
    }

    #[test]
    fn test_absent_dimension_matches_nothing() {
        let db = Database::open_in_memory().unwrap();
        // A row whose bore diameter is itself missing still does not match.
        db.insert_combination(&Combination::new("no-bore")).unwrap();

        let found = scan(
            &db,
            &CatalogQuery {
                tool_type: Some("Standard End Mills".to_string()),
                ..CatalogQuery::default()
            },
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_text_equality_is_exact() {
        let db = seeded();
        let predicate = Predicate::all(vec![Comparison::Equals {
            attribute: Attribute::Spindle,
            value: Operand::Text("a".to_string()),
        }])
        .unwrap();
        assert!(db.scan(&predicate).unwrap().is_empty());
    }

    #[test]
    fn test_import_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "1", "spindle": "A", "length": 100, "productSKUMasterHolder": "MH-1"}},
                {{"id": "2", "spindle": "B", "length": 300}},
                {{"id": "1", "spindle": "A", "length": 120, "productSKUMasterHolder": "MH-1b"}}
            ]"#
        )
        .unwrap();

        let mut db = Database::open_in_memory().unwrap();
        assert_eq!(db.import_json(file.path()).unwrap(), 3);
        // The repeated id replaced the first row.
        assert_eq!(db.count_combinations().unwrap(), 2);

        let found = scan(
            &db,
            &CatalogQuery {
                spindle: Some("A".to_string()),
                ..CatalogQuery::default()
            },
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].length, Some(120));
        assert_eq!(found[0].master_holder_sku.as_deref(), Some("MH-1b"));
    }

    #[test]
    fn test_import_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not": "an array"}}"#).unwrap();

        let mut db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.import_json(file.path()).unwrap_err(),
            crate::Error::Serialization(_)
        ));
    }
}
