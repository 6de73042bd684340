use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;

use crate::growth::GrowthError;
use crate::models::{Plant, WateringRecord};
use crate::utils::get_current_timestamp_string;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error(transparent)]
    InvalidInput(#[from] GrowthError),
    #[error("Failed to (de)serialize image references: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub struct Database {
    conn: Connection,
}

const PLANT_COLUMNS: &str = "id, name, strain, plant_date, flowering_start_date, flowering_weeks, notes, image_urls, created_at, updated_at";

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;

        let db = Database { conn };
        db.initialize_schema()?;

        tracing::debug!(path = %db_path.display(), "database opened");
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS plants (
                id                    INTEGER PRIMARY KEY AUTOINCREMENT,
                name                  TEXT NOT NULL,
                strain                TEXT,
                plant_date            TEXT NOT NULL,
                flowering_start_date  TEXT,
                flowering_weeks       INTEGER NOT NULL DEFAULT 8 CHECK (flowering_weeks > 0),
                notes                 TEXT,
                image_urls            TEXT NOT NULL DEFAULT '[]',
                created_at            TEXT NOT NULL,
                updated_at            TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS watering_records (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                plant_id    INTEGER NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
                watered_at  TEXT NOT NULL,
                notes       TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_plants_created_at ON plants(created_at)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_watering_plant_id ON watering_records(plant_id, watered_at)",
            [],
        )?;

        Ok(())
    }

    /// Helper function to map a row to a Plant
    fn row_to_plant(row: &rusqlite::Row) -> Result<Plant, rusqlite::Error> {
        let image_urls: String = row.get(7)?;
        let image_urls = serde_json::from_str(&image_urls).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Plant {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            strain: row.get(2)?,
            plant_date: row.get(3)?,
            flowering_start_date: row.get(4)?,
            flowering_weeks: row.get(5)?,
            notes: row.get(6)?,
            image_urls,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }

    fn row_to_watering(row: &rusqlite::Row) -> Result<WateringRecord, rusqlite::Error> {
        Ok(WateringRecord {
            id: Some(row.get(0)?),
            plant_id: row.get(1)?,
            watered_at: row.get(2)?,
            notes: row.get(3)?,
        })
    }

    /// Insert a plant into the database and return its ID
    pub fn insert_plant(&self, plant: &Plant) -> Result<i64, DatabaseError> {
        plant.validate()?;
        let image_urls = serde_json::to_string(&plant.image_urls)?;

        self.conn.execute(
            "INSERT INTO plants (name, strain, plant_date, flowering_start_date, flowering_weeks, notes, image_urls, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                plant.name.trim(),
                plant.strain,
                plant.plant_date.trim(),
                plant.flowering_start_date,
                plant.flowering_weeks,
                plant.notes,
                image_urls,
                plant.created_at,
                plant.updated_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(plant_id = id, name = %plant.name, "plant created");
        Ok(id)
    }

    /// Get all plants, newest first
    pub fn get_all_plants(&self) -> Result<Vec<Plant>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM plants ORDER BY created_at DESC, id DESC",
            PLANT_COLUMNS
        ))?;
        let plants = stmt
            .query_map([], Self::row_to_plant)?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = plants.len(), "plants loaded");
        Ok(plants)
    }

    /// Get a single plant by ID
    pub fn get_plant(&self, id: i64) -> Result<Plant, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM plants WHERE id = ?1",
            PLANT_COLUMNS
        ))?;

        stmt.query_row(rusqlite::params![id], Self::row_to_plant)
            .optional()?
            .ok_or(DatabaseError::NotFound { kind: "Plant", id })
    }

    /// Update an existing plant, stamping `updated_at`
    pub fn update_plant(&self, plant: &Plant) -> Result<(), DatabaseError> {
        let id = plant.id.ok_or_else(|| {
            GrowthError::InvalidInput("cannot update a plant without an id".to_string())
        })?;
        plant.validate()?;
        let image_urls = serde_json::to_string(&plant.image_urls)?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE plants SET name = ?1, strain = ?2, plant_date = ?3, flowering_start_date = ?4,
                flowering_weeks = ?5, notes = ?6, image_urls = ?7, updated_at = ?8
             WHERE id = ?9",
            rusqlite::params![
                plant.name.trim(),
                plant.strain,
                plant.plant_date.trim(),
                plant.flowering_start_date,
                plant.flowering_weeks,
                plant.notes,
                image_urls,
                get_current_timestamp_string(),
                id
            ],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { kind: "Plant", id });
        }
        tx.commit()?;

        tracing::info!(plant_id = id, "plant updated");
        Ok(())
    }

    /// Record that flowering started now. Does not affect the computed phase.
    pub fn start_flowering(&self, id: i64) -> Result<Plant, DatabaseError> {
        let now = get_current_timestamp_string();
        let changed = self.conn.execute(
            "UPDATE plants SET flowering_start_date = ?1, updated_at = ?1 WHERE id = ?2",
            rusqlite::params![now, id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound { kind: "Plant", id });
        }

        tracing::info!(plant_id = id, started = %now, "flowering started");
        self.get_plant(id)
    }

    /// Delete a plant and its watering records
    pub fn delete_plant(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM watering_records WHERE plant_id = ?1",
            rusqlite::params![id],
        )?;
        let deleted = tx.execute("DELETE FROM plants WHERE id = ?1", rusqlite::params![id])?;
        if deleted == 0 {
            return Err(DatabaseError::NotFound { kind: "Plant", id });
        }
        tx.commit()?;

        tracing::info!(plant_id = id, "plant deleted");
        Ok(())
    }

    /// Append a watering record for a plant and return it
    pub fn insert_watering(&self, record: &WateringRecord) -> Result<WateringRecord, DatabaseError> {
        // Surface a missing plant as NotFound rather than a constraint failure
        self.get_plant(record.plant_id)?;

        self.conn.execute(
            "INSERT INTO watering_records (plant_id, watered_at, notes) VALUES (?1, ?2, ?3)",
            rusqlite::params![record.plant_id, record.watered_at, record.notes],
        )?;
        let id = self.conn.last_insert_rowid();

        tracing::info!(plant_id = record.plant_id, watering_id = id, "plant watered");
        Ok(WateringRecord {
            id: Some(id),
            ..record.clone()
        })
    }

    /// Watering records for a plant, newest first
    pub fn get_waterings(&self, plant_id: i64) -> Result<Vec<WateringRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, plant_id, watered_at, notes
             FROM watering_records WHERE plant_id = ?1 ORDER BY watered_at DESC, id DESC"
        )?;
        let records = stmt
            .query_map(rusqlite::params![plant_id], Self::row_to_watering)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Most recent watering for a plant, if any
    pub fn get_last_watering(&self, plant_id: i64) -> Result<Option<WateringRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, plant_id, watered_at, notes
             FROM watering_records WHERE plant_id = ?1 ORDER BY watered_at DESC, id DESC LIMIT 1"
        )?;
        Ok(stmt.query_row(rusqlite::params![plant_id], Self::row_to_watering).optional()?)
    }
}
