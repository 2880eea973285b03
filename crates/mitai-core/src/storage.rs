//! String key-value stores backing the watchlist.

use std::collections::HashMap;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::MitaiError;

const SCHEMA_V1: &str = include_str!("../../../migrations/001_kv.sql");

/// A persistent string-keyed store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, MitaiError>;

    /// Insert or overwrite the value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), MitaiError>;
}

/// SQLite-backed store, one row per key.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, MitaiError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA_V1)?;
        tracing::debug!(path = %path.display(), "opened key-value store");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, MitaiError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_V1)?;
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, MitaiError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(Into::into)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), MitaiError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

/// Process-local store; contents vanish on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, MitaiError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), MitaiError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
