//! SQLite-backed event store.
//!
//! The single source of truth: an append/delete log of quantity events keyed
//! by id. Every mutation commits before the call returns (SQLite autocommit,
//! no batching), so a returned `Ok` means the entry is durable.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::entry::LogEntry;
use crate::error::StorageError;

use super::data_dir;

/// SQLite database holding the event log.
pub struct Database {
    conn: Connection,
}

/// Timestamps are stored as fixed-width RFC 3339 UTC with microseconds so
/// that SQL string comparison orders rows chronologically.
fn encode_ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl Database {
    /// Open the database at `~/.config/pouchlog/pouchlog.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?
            .join("pouchlog.db");
        Self::open_at(&path)
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS entries (
                    id        TEXT PRIMARY KEY,
                    timestamp TEXT NOT NULL,
                    quantity  INTEGER NOT NULL,
                    source    TEXT,
                    note      TEXT
                );

                CREATE INDEX IF NOT EXISTS idx_entries_timestamp ON entries(timestamp);",
            )
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))
    }

    /// Insert an entry, replacing any previous row with the same id.
    ///
    /// # Errors
    /// Returns an error only if the underlying write fails.
    pub fn insert(&self, entry: &LogEntry) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO entries (id, timestamp, quantity, source, note)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.id.to_string(),
                encode_ts(entry.timestamp),
                entry.quantity,
                entry.source,
                entry.note,
            ],
        )?;
        Ok(())
    }

    /// Delete an entry. Returns false (not an error) when the id is absent,
    /// so repeated deletes with a stale id stay harmless.
    pub fn delete(&self, id: &Uuid) -> Result<bool, StorageError> {
        let affected = self
            .conn
            .execute("DELETE FROM entries WHERE id = ?1", params![id.to_string()])?;
        Ok(affected > 0)
    }

    /// Move an entry to a new timestamp. The only supported field mutation
    /// besides deletion. Returns false when the id is absent.
    pub fn retime(&self, id: &Uuid, timestamp: DateTime<Utc>) -> Result<bool, StorageError> {
        let affected = self.conn.execute(
            "UPDATE entries SET timestamp = ?2 WHERE id = ?1",
            params![id.to_string(), encode_ts(timestamp)],
        )?;
        Ok(affected > 0)
    }

    /// Fetch a single entry by id.
    pub fn entry(&self, id: &Uuid) -> Result<Option<LogEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, quantity, source, note FROM entries WHERE id = ?1",
        )?;
        let mut rows = Self::collect_entries(&mut stmt, params![id.to_string()])?;
        Ok(rows.pop())
    }

    /// All entries with `start <= timestamp < end`, ascending.
    pub fn entries_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<LogEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, quantity, source, note FROM entries
             WHERE timestamp >= ?1 AND timestamp < ?2
             ORDER BY timestamp ASC",
        )?;
        Self::collect_entries(&mut stmt, params![encode_ts(start), encode_ts(end)])
    }

    /// Every entry, newest first (the display ordering).
    pub fn all_entries(&self) -> Result<Vec<LogEntry>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, quantity, source, note FROM entries
             ORDER BY timestamp DESC",
        )?;
        Self::collect_entries(&mut stmt, [])
    }

    /// Sum of quantities with `start <= timestamp < end`.
    pub fn sum_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, StorageError> {
        let sum = self.conn.query_row(
            "SELECT COALESCE(SUM(quantity), 0) FROM entries
             WHERE timestamp >= ?1 AND timestamp < ?2",
            params![encode_ts(start), encode_ts(end)],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(sum)
    }

    /// Sum of quantities over every entry ever recorded.
    pub fn total(&self) -> Result<i64, StorageError> {
        let sum = self
            .conn
            .query_row("SELECT COALESCE(SUM(quantity), 0) FROM entries", [], |row| {
                row.get::<_, i64>(0)
            })?;
        Ok(sum)
    }

    fn collect_entries<P: rusqlite::Params>(
        stmt: &mut rusqlite::Statement<'_>,
        params: P,
    ) -> Result<Vec<LogEntry>, StorageError> {
        let rows = stmt.query_map(params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, ts, quantity, source, note) = row?;
            let parsed_id = Uuid::parse_str(&id).map_err(|e| StorageError::CorruptRow {
                id: id.clone(),
                message: e.to_string(),
            })?;
            let timestamp = DateTime::parse_from_rfc3339(&ts)
                .map_err(|e| StorageError::CorruptRow {
                    id: id.clone(),
                    message: e.to_string(),
                })?
                .with_timezone(&Utc);
            entries.push(LogEntry {
                id: parsed_id,
                timestamp,
                quantity,
                source,
                note,
            });
        }
        Ok(entries)
    }
}
