/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Holder / adapter / clamp combinations
CREATE TABLE IF NOT EXISTS combinations (
    id TEXT PRIMARY KEY,
    spindle TEXT,
    length INTEGER,
    holder_angle TEXT,
    extension_angle TEXT,
    bore_diameter TEXT,
    cutting_diameter TEXT,
    edge_radius TEXT,
    thread TEXT,
    master_holder_sku TEXT,
    extension_adapter_sku TEXT,
    clamping_extension_sku TEXT
);

CREATE INDEX IF NOT EXISTS idx_combinations_spindle ON combinations(spindle);
CREATE INDEX IF NOT EXISTS idx_combinations_length ON combinations(length);
"#;

/// All migrations in order.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: MIGRATION_001,
}];
