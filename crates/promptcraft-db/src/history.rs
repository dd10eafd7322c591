//! History table access.

use chrono::{DateTime, Utc};
use promptcraft_core::{AnswerStore, Category, HistoryRecord};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::MutexGuard;

const COLUMNS: &str = "id, original, enhanced, category, answers, created_at";

/// History store with a borrowed connection.
pub struct History<'db> {
    conn: MutexGuard<'db, Connection>,
}

impl<'db> History<'db> {
    pub(crate) fn new(conn: MutexGuard<'db, Connection>) -> Self {
        Self { conn }
    }

    /// Insert a record as the most recent, then drop everything beyond the
    /// `capacity` most recent records.
    pub fn insert(&self, record: &HistoryRecord, capacity: usize) -> Result<(), rusqlite::Error> {
        let answers = serde_json::to_string(&record.answers)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            r#"
            INSERT INTO history (id, original, enhanced, category, answers, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id,
                record.original,
                record.enhanced,
                record.category.tag(),
                answers,
                record.created_at.to_rfc3339(),
            ],
        )?;
        tx.execute(
            r#"
            DELETE FROM history WHERE seq NOT IN (
                SELECT seq FROM history ORDER BY seq DESC LIMIT ?1
            )
            "#,
            params![capacity as i64],
        )?;
        tx.commit()
    }

    /// All records, most recent first.
    pub fn list(&self) -> Result<Vec<HistoryRecord>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM history ORDER BY seq DESC", COLUMNS))?;
        let rows = stmt.query_map([], Self::row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }

    pub fn get(&self, id: &str) -> Result<Option<HistoryRecord>, rusqlite::Error> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM history WHERE id = ?1", COLUMNS),
                params![id],
                Self::row_to_record,
            )
            .optional()
    }

    pub fn count(&self) -> Result<usize, rusqlite::Error> {
        self.conn
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get::<_, i64>(0))
            .map(|n| n as usize)
    }

    /// Delete a record by ID.
    pub fn delete(&self, id: &str) -> Result<bool, rusqlite::Error> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM history WHERE id = ?1", params![id])?;
        Ok(rows_affected > 0)
    }

    pub fn clear(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute("DELETE FROM history", [])?;
        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row) -> Result<HistoryRecord, rusqlite::Error> {
        let category: String = row.get(3)?;
        let answers_json: String = row.get(4)?;
        let created_at_str: String = row.get(5)?;

        let answers: AnswerStore = serde_json::from_str(&answers_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(HistoryRecord {
            id: row.get(0)?,
            original: row.get(1)?,
            enhanced: row.get(2)?,
            category: Category::from_tag_or_default(&category),
            answers,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
        })
    }
}
