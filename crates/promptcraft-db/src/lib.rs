//! SQLite persistence for promptcraft.
//!
//! [`Database`] owns the connection, hands out the [`History`] store, and
//! implements [`HistoryStore`] so the wizard can write to it directly.

mod history;

pub use history::History;

use promptcraft_core::{
    HistoryRecord, HistoryStore, NewHistoryRecord, StorageError, HISTORY_CAPACITY,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// The main database struct that owns the SQLite connection.
pub struct Database {
    conn: Mutex<Connection>,
    capacity: usize,
}

impl Database {
    /// Open or create a database at the default location.
    ///
    /// The default location is `~/.local/share/promptcraft/history.db`.
    pub fn open() -> Result<Self, rusqlite::Error> {
        Self::open_at(&Self::default_path())
    }

    /// Open or create a database at a specific path, creating parent
    /// directories as needed.
    pub fn open_at(path: &Path) -> Result<Self, rusqlite::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        debug!(path = %path.display(), "Opening history database");
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Get the default database path.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("promptcraft")
            .join("history.db")
    }

    /// Retain at most `capacity` records instead of [`HISTORY_CAPACITY`]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Access the history store.
    pub fn history(&self) -> Result<History<'_>, StorageError> {
        let conn = self.conn.lock().map_err(|_| StorageError::Unavailable)?;
        Ok(History::new(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            capacity: HISTORY_CAPACITY,
        }
    }

    /// Initialize the database schema.
    fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS history (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                original TEXT NOT NULL,
                enhanced TEXT NOT NULL,
                category TEXT NOT NULL,
                answers TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
    }
}

fn storage_error(e: rusqlite::Error) -> StorageError {
    match e {
        rusqlite::Error::ToSqlConversionFailure(inner) => {
            StorageError::Serialization(inner.to_string())
        }
        other => StorageError::Database(other.to_string()),
    }
}

impl HistoryStore for Database {
    fn append(&self, record: NewHistoryRecord) -> Result<HistoryRecord, StorageError> {
        let record = HistoryRecord::from_new(record);
        self.history()?
            .insert(&record, self.capacity)
            .map_err(storage_error)?;
        debug!(id = %record.id, "Saved history record");
        Ok(record)
    }

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        self.history()?.list().map_err(storage_error)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<HistoryRecord>, StorageError> {
        self.history()?.get(id).map_err(storage_error)
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        self.history()?.delete(id).map_err(storage_error)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.history()?.clear().map_err(storage_error)
    }
}
