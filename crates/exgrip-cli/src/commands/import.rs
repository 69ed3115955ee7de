use anyhow::{Context, Result};
use std::path::Path;

use exgrip_api::Config;
use exgrip_core::schema::Database;

pub fn run_import(config: &Config, file: &Path) -> Result<()> {
    let mut db = Database::open(&config.database_path)?;

    let imported = db
        .import_json(file)
        .with_context(|| format!("Failed to import {}", file.display()))?;
    let total = db.count_combinations()?;

    println!("✓ Imported {} combinations from {}", imported, file.display());
    println!("  Database: {}", config.database_path.display());
    println!("  Total combinations: {}", total);

    Ok(())
}
