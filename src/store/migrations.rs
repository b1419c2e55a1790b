//! SQL migration definitions for the property database.
//!
//! Migrations are applied in ascending order when the store opens; the
//! `schema_migrations` table records which versions have run.

/// A database migration with a version and its SQL statements.
pub(crate) struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// All migrations, in ascending version order.
pub(crate) fn all_migrations() -> Vec<Migration> {
    vec![Migration {
        version: 1,
        description: "Initial schema: locations, properties, amenities, summaries",
        sql: r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version    INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS locations (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS properties (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    rating      REAL NOT NULL DEFAULT 0,
    location_id INTEGER REFERENCES locations(id)
);

CREATE INDEX IF NOT EXISTS idx_properties_location ON properties(location_id);

CREATE TABLE IF NOT EXISTS amenities (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS property_amenities (
    property_id INTEGER NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    amenity_id  INTEGER NOT NULL REFERENCES amenities(id) ON DELETE CASCADE,
    PRIMARY KEY (property_id, amenity_id)
);

-- One summary per property, by constraint
CREATE TABLE IF NOT EXISTS summaries (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    property_id INTEGER NOT NULL UNIQUE REFERENCES properties(id) ON DELETE CASCADE,
    summary     TEXT NOT NULL,
    create_date TEXT NOT NULL,
    update_date TEXT NOT NULL
);

INSERT INTO schema_migrations (version) VALUES (1);
"#,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_strictly_ascending() {
        let migrations = all_migrations();
        assert!(!migrations.is_empty());
        for pair in migrations.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }

    #[test]
    fn test_each_migration_records_its_version() {
        for migration in all_migrations() {
            let marker = format!(
                "INSERT INTO schema_migrations (version) VALUES ({})",
                migration.version
            );
            assert!(
                migration.sql.contains(&marker),
                "migration v{} does not record itself",
                migration.version
            );
        }
    }
}
