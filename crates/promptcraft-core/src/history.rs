//! Enhanced-prompt history.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AnswerStore, Category};

/// Number of records a history store retains
pub const HISTORY_CAPACITY: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Failed to encode record: {0}")]
    Serialization(String),

    #[error("History store is unavailable")]
    Unavailable,
}

/// A record before the store has assigned it an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHistoryRecord {
    pub original: String,
    pub enhanced: String,
    pub category: Category,
    pub answers: AnswerStore,
}

/// A stored wizard result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub original: String,
    pub enhanced: String,
    pub category: Category,
    pub answers: AnswerStore,
    pub created_at: DateTime<Utc>,
}

impl HistoryRecord {
    /// Assign a fresh id and timestamp
    pub fn from_new(record: NewHistoryRecord) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            original: record.original,
            enhanced: record.enhanced,
            category: record.category,
            answers: record.answers,
            created_at: Utc::now(),
        }
    }

    /// First `max_chars` of the enhanced text, for list views
    pub fn preview(&self, max_chars: usize) -> String {
        let mut preview: String = self.enhanced.chars().take(max_chars).collect();
        if self.enhanced.chars().count() > max_chars {
            preview.push_str("...");
        }
        preview
    }
}

/// Persistent list of enhanced prompts, most recent first.
///
/// Implementations retain at most [`HISTORY_CAPACITY`] records and evict the
/// oldest on overflow.
pub trait HistoryStore: Send + Sync {
    fn append(&self, record: NewHistoryRecord) -> Result<HistoryRecord, StorageError>;

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError>;

    fn get_by_id(&self, id: &str) -> Result<Option<HistoryRecord>, StorageError>;

    /// Returns whether a record was removed
    fn delete(&self, id: &str) -> Result<bool, StorageError>;

    fn clear(&self) -> Result<(), StorageError>;
}

/// History kept in process memory only
#[derive(Debug)]
pub struct MemoryHistory {
    records: Mutex<VecDeque<HistoryRecord>>,
    capacity: usize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::new()),
            capacity,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, VecDeque<HistoryRecord>>, StorageError> {
        self.records.lock().map_err(|_| StorageError::Unavailable)
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for MemoryHistory {
    fn append(&self, record: NewHistoryRecord) -> Result<HistoryRecord, StorageError> {
        let record = HistoryRecord::from_new(record);
        let mut records = self.lock()?;
        records.push_front(record.clone());
        records.truncate(self.capacity);
        Ok(record)
    }

    fn list(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        Ok(self.lock()?.iter().cloned().collect())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<HistoryRecord>, StorageError> {
        Ok(self.lock()?.iter().find(|r| r.id == id).cloned())
    }

    fn delete(&self, id: &str) -> Result<bool, StorageError> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.lock()?.clear();
        Ok(())
    }
}
