//! Data types shared by the store and the refresh pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored property, hydrated with its location and amenity names.
///
/// The refresh pipeline only ever mutates `title` and `description`;
/// everything else is read to build the summarization prompt.
#[derive(Debug, Clone, Serialize)]
pub struct Property {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub rating: f64,
    pub location: Option<String>,
    pub amenities: Vec<String>,
}

/// A property to be inserted, as accepted by the `seed` command.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProperty {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

/// The rewritten fields and summary text persisted for one property,
/// all inside a single transaction.
#[derive(Debug, Clone)]
pub struct PropertyUpdate {
    pub property_id: i64,
    pub title: String,
    pub description: String,
    pub summary: String,
}

/// A stored summary row. At most one exists per property.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub id: i64,
    pub property_id: i64,
    pub summary: String,
    pub create_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}
