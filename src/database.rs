use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

use crate::models::{Appointment, Field};

/// Schema version recorded in `PRAGMA user_version`
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Failed to write appointment: {0}")]
    Write(String),
    #[error("Failed to delete appointment {id}: {reason}")]
    Delete { id: i64, reason: String },
    #[error("Appointment {0} does not exist")]
    NotFound(i64),
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
}

const SELECT_COLUMNS: &str = "SELECT id, pet, owner, phone, date, time, symptoms FROM appointments";

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the store at `path`, creating the schema on first use
    pub fn open(path: &Path, schema_version: u32) -> Result<Self, DatabaseError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DatabaseError::StorageUnavailable(format!(
                        "cannot create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let conn = Connection::open(path).map_err(|e| {
            DatabaseError::StorageUnavailable(format!("cannot open {}: {}", path.display(), e))
        })?;
        Self::from_connection(conn, schema_version)
    }

    /// Open a private in-memory store
    pub fn open_in_memory(schema_version: u32) -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DatabaseError::StorageUnavailable(e.to_string()))?;
        Self::from_connection(conn, schema_version)
    }

    fn from_connection(conn: Connection, schema_version: u32) -> Result<Self, DatabaseError> {
        let db = Database { conn };
        db.upgrade(schema_version)?;
        Ok(db)
    }

    /// Bring the schema up to `schema_version`. Only the first version exists,
    /// so this either creates everything or checks that nothing newer is stored.
    fn upgrade(&self, schema_version: u32) -> Result<(), DatabaseError> {
        let stored: u32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(|e| DatabaseError::StorageUnavailable(e.to_string()))?;

        if stored > schema_version {
            return Err(DatabaseError::StorageUnavailable(format!(
                "store has schema version {}, newer than requested {}",
                stored, schema_version
            )));
        }
        if stored == schema_version {
            return Ok(());
        }

        tracing::info!(from = stored, to = schema_version, "creating appointment store schema");
        self.create_schema(schema_version)
            .map_err(|e| DatabaseError::StorageUnavailable(format!("cannot create schema: {}", e)))
    }

    fn create_schema(&self, schema_version: u32) -> Result<(), rusqlite::Error> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "CREATE TABLE IF NOT EXISTS appointments (
                id          INTEGER PRIMARY KEY,
                pet         TEXT NOT NULL,
                owner       TEXT NOT NULL,
                phone       TEXT NOT NULL DEFAULT '',
                date        TEXT NOT NULL,
                time        TEXT NOT NULL,
                symptoms    TEXT NOT NULL
            )",
            [],
        )?;

        // One lookup index per field
        for field in Field::ALL {
            tx.execute(
                &format!(
                    "CREATE INDEX IF NOT EXISTS idx_appointments_{col} ON appointments({col})",
                    col = field.column()
                ),
                [],
            )?;
        }
        tx.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_id ON appointments(id)",
            [],
        )?;
        // PRAGMA does not take bound parameters
        tx.execute_batch(&format!("PRAGMA user_version = {}", schema_version))?;
        tx.commit()?;
        Ok(())
    }

    pub fn schema_version(&self) -> Result<u32, DatabaseError> {
        Ok(self.conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Insert an appointment and return its id. SQLite picks the id when
    /// the record has none.
    pub fn insert(&self, appointment: &Appointment) -> Result<i64, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO appointments (id, pet, owner, phone, date, time, symptoms)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                appointment.id,
                appointment.pet,
                appointment.owner,
                appointment.phone,
                appointment.date,
                appointment.time,
                appointment.symptoms,
            ],
        )
        .map_err(|e| DatabaseError::Write(e.to_string()))?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// Overwrite the stored record with the same id
    pub fn update(&self, appointment: &Appointment) -> Result<i64, DatabaseError> {
        let id = appointment
            .id
            .ok_or_else(|| DatabaseError::Write("appointment has no id".to_string()))?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx
            .execute(
                "UPDATE appointments SET pet = ?1, owner = ?2, phone = ?3, date = ?4,
                 time = ?5, symptoms = ?6 WHERE id = ?7",
                rusqlite::params![
                    appointment.pet,
                    appointment.owner,
                    appointment.phone,
                    appointment.date,
                    appointment.time,
                    appointment.symptoms,
                    id
                ],
            )
            .map_err(|e| DatabaseError::Write(e.to_string()))?;
        if changed == 0 {
            return Err(DatabaseError::NotFound(id));
        }
        tx.commit()?;
        Ok(id)
    }

    /// Delete by id. Deleting an id that is not stored is not an error.
    pub fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM appointments WHERE id = ?1", rusqlite::params![id])
            .map_err(|e| DatabaseError::Delete {
                id,
                reason: e.to_string(),
            })?;
        tx.commit()?;
        Ok(())
    }

    fn row_to_appointment(row: &rusqlite::Row) -> Result<Appointment, rusqlite::Error> {
        Ok(Appointment {
            id: Some(row.get(0)?),
            pet: row.get(1)?,
            owner: row.get(2)?,
            phone: row.get(3)?,
            date: row.get(4)?,
            time: row.get(5)?,
            symptoms: row.get(6)?,
        })
    }

    /// Get a single appointment by id
    pub fn get(&self, id: i64) -> Result<Option<Appointment>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
        let appointment = stmt
            .query_row(rusqlite::params![id], Self::row_to_appointment)
            .optional()?;
        Ok(appointment)
    }

    /// Visit every stored appointment in id order. Each call reads from the start.
    pub fn for_each<F>(&self, mut visit: F) -> Result<(), DatabaseError>
    where
        F: FnMut(Appointment),
    {
        let mut stmt = self.conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
        let rows = stmt.query_map([], Self::row_to_appointment)?;
        for row in rows {
            visit(row?);
        }
        Ok(())
    }

    /// Get all appointments in id order
    pub fn all(&self) -> Result<Vec<Appointment>, DatabaseError> {
        let mut appointments = Vec::new();
        self.for_each(|a| appointments.push(a))?;
        Ok(appointments)
    }

    pub fn count(&self) -> Result<usize, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Largest stored id, 0 for an empty store
    pub fn max_id(&self) -> Result<i64, DatabaseError> {
        let max: Option<i64> = self
            .conn
            .query_row("SELECT MAX(id) FROM appointments", [], |row| row.get(0))?;
        Ok(max.unwrap_or(0))
    }
}
