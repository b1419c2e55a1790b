//! libSQL-backed persistence for properties and their summaries.
//!
//! The [`Store`] owns a local database and exposes the small surface
//! the refresh pipeline consumes: list properties, apply one property's
//! rewritten fields plus its summary in a single transaction, and look
//! summaries back up. Seeding helpers exist for the CLI and tests;
//! property records otherwise come from elsewhere.

mod migrations;

use std::path::Path;

use chrono::{DateTime, Utc};
use libsql::{params, Connection, Database, Row};
use tracing::info;

use crate::error::{RefreshError, Result};
use crate::model::{NewProperty, Property, PropertyUpdate, Summary};

/// Storage handle wrapping a local libSQL database.
pub struct Store {
    #[allow(dead_code)]
    db: Database,
    conn: Connection,
}

impl Store {
    /// Open or create a database at `path` and bring its schema up to
    /// date.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RefreshError::Other(format!("could not create {}: {e}", parent.display()))
            })?;
        }

        let db = libsql::Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Needed for the summaries -> properties constraint and the
        // cascading deletes; off by default in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", params![]).await?;

        let store = Self { db, conn };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run pending schema migrations.
    async fn run_migrations(&self) -> Result<()> {
        let current_version = self.schema_version().await;

        for migration in migrations::all_migrations() {
            if migration.version > current_version {
                info!(
                    version = migration.version,
                    description = migration.description,
                    "applying migration"
                );
                self.conn.execute_batch(migration.sql).await?;
            }
        }
        Ok(())
    }

    /// Current schema version, or 0 before any migration has run.
    async fn schema_version(&self) -> u32 {
        let result = self
            .conn
            .query("SELECT MAX(version) FROM schema_migrations", params![])
            .await;

        match result {
            Ok(mut rows) => {
                if let Ok(Some(row)) = rows.next().await {
                    row.get::<u32>(0).unwrap_or(0)
                } else {
                    0
                }
            }
            // Table does not exist yet
            Err(_) => 0,
        }
    }

    // -----------------------------------------------------------------------
    // Property reads
    // -----------------------------------------------------------------------

    /// List all properties with their location and amenity names
    /// hydrated, in id order.
    pub async fn list_properties(&self) -> Result<Vec<Property>> {
        let mut rows = self
            .conn
            .query(
                "SELECT p.id, p.title, p.description, p.rating, l.name
                 FROM properties p
                 LEFT JOIN locations l ON l.id = p.location_id
                 ORDER BY p.id",
                params![],
            )
            .await?;

        let mut bases = Vec::new();
        while let Some(row) = rows.next().await? {
            bases.push(property_parts(&row)?);
        }

        let mut properties = Vec::with_capacity(bases.len());
        for (id, title, description, rating, location) in bases {
            let amenities = self.amenity_names(id).await?;
            properties.push(Property {
                id,
                title,
                description,
                rating,
                location,
                amenities,
            });
        }
        Ok(properties)
    }

    /// Fetch a single property by id.
    pub async fn get_property(&self, id: i64) -> Result<Option<Property>> {
        let mut rows = self
            .conn
            .query(
                "SELECT p.id, p.title, p.description, p.rating, l.name
                 FROM properties p
                 LEFT JOIN locations l ON l.id = p.location_id
                 WHERE p.id = ?1",
                params![id],
            )
            .await?;

        let parts = match rows.next().await? {
            Some(row) => property_parts(&row)?,
            None => return Ok(None),
        };
        let (id, title, description, rating, location) = parts;
        let amenities = self.amenity_names(id).await?;
        Ok(Some(Property {
            id,
            title,
            description,
            rating,
            location,
            amenities,
        }))
    }

    async fn amenity_names(&self, property_id: i64) -> Result<Vec<String>> {
        let mut rows = self
            .conn
            .query(
                "SELECT a.name
                 FROM amenities a
                 JOIN property_amenities pa ON pa.amenity_id = a.id
                 WHERE pa.property_id = ?1
                 ORDER BY a.name",
                params![property_id],
            )
            .await?;

        let mut names = Vec::new();
        while let Some(row) = rows.next().await? {
            names.push(row.get::<String>(0)?);
        }
        Ok(names)
    }

    // -----------------------------------------------------------------------
    // Seeding
    // -----------------------------------------------------------------------

    /// Insert a property with its location and amenities, creating any
    /// missing location/amenity rows by name. Returns the new id.
    pub async fn insert_property(&self, property: &NewProperty) -> Result<i64> {
        let location_id = match &property.location {
            Some(name) => Some(self.ensure_location(name).await?),
            None => None,
        };

        self.conn
            .execute(
                "INSERT INTO properties (title, description, rating, location_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    property.title.as_str(),
                    property.description.as_str(),
                    property.rating,
                    location_id,
                ],
            )
            .await?;
        let id = self.conn.last_insert_rowid();

        for amenity in &property.amenities {
            let amenity_id = self.ensure_amenity(amenity).await?;
            self.conn
                .execute(
                    "INSERT OR IGNORE INTO property_amenities (property_id, amenity_id)
                     VALUES (?1, ?2)",
                    params![id, amenity_id],
                )
                .await?;
        }

        Ok(id)
    }

    async fn ensure_location(&self, name: &str) -> Result<i64> {
        let mut rows = self
            .conn
            .query("SELECT id FROM locations WHERE name = ?1", params![name])
            .await?;
        if let Some(row) = rows.next().await? {
            return Ok(row.get::<i64>(0)?);
        }
        self.conn
            .execute("INSERT INTO locations (name) VALUES (?1)", params![name])
            .await?;
        Ok(self.conn.last_insert_rowid())
    }

    async fn ensure_amenity(&self, name: &str) -> Result<i64> {
        let mut rows = self
            .conn
            .query("SELECT id FROM amenities WHERE name = ?1", params![name])
            .await?;
        if let Some(row) = rows.next().await? {
            return Ok(row.get::<i64>(0)?);
        }
        self.conn
            .execute("INSERT INTO amenities (name) VALUES (?1)", params![name])
            .await?;
        Ok(self.conn.last_insert_rowid())
    }

    // -----------------------------------------------------------------------
    // The per-record write
    // -----------------------------------------------------------------------

    /// Persist one record's refresh: the rewritten title/description and
    /// the summary upsert, inside a single transaction.
    ///
    /// The summary's `create_date` is set once and preserved on
    /// subsequent upserts; `update_date` is bumped every time. Any
    /// failure rolls the whole transaction back.
    pub async fn apply_update(&self, update: &PropertyUpdate) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.transaction().await?;
        if let Err(err) = write_update(&tx, update, &now).await {
            tx.rollback().await.ok();
            return Err(err);
        }
        tx.commit().await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Summary reads
    // -----------------------------------------------------------------------

    /// Fetch the summary for a property, if one exists.
    pub async fn get_summary(&self, property_id: i64) -> Result<Option<Summary>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, property_id, summary, create_date, update_date
                 FROM summaries WHERE property_id = ?1",
                params![property_id],
            )
            .await?;

        match rows.next().await? {
            Some(row) => Ok(Some(Summary {
                id: row.get::<i64>(0)?,
                property_id: row.get::<i64>(1)?,
                summary: row.get::<String>(2)?,
                create_date: parse_timestamp(&row.get::<String>(3)?)?,
                update_date: parse_timestamp(&row.get::<String>(4)?)?,
            })),
            None => Ok(None),
        }
    }

    /// Total number of summary rows.
    pub async fn count_summaries(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM summaries", params![])
            .await?;
        match rows.next().await? {
            Some(row) => Ok(row.get::<i64>(0)? as u64),
            None => Ok(0),
        }
    }
}

async fn write_update(tx: &libsql::Transaction, update: &PropertyUpdate, now: &str) -> Result<()> {
    tx.execute(
        "UPDATE properties SET title = ?1, description = ?2 WHERE id = ?3",
        params![
            update.title.as_str(),
            update.description.as_str(),
            update.property_id,
        ],
    )
    .await?;

    tx.execute(
        "INSERT INTO summaries (property_id, summary, create_date, update_date)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(property_id) DO UPDATE SET
           summary = excluded.summary,
           update_date = excluded.update_date",
        params![update.property_id, update.summary.as_str(), now, now],
    )
    .await?;

    Ok(())
}

fn property_parts(row: &Row) -> Result<(i64, String, String, f64, Option<String>)> {
    Ok((
        row.get::<i64>(0)?,
        row.get::<String>(1)?,
        row.get::<String>(2)?,
        row.get::<f64>(3)?,
        row.get::<String>(4).ok(),
    ))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RefreshError::Other(format!("bad timestamp in summaries row: {e}")))
}
