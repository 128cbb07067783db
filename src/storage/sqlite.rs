use super::KeyValueStore;
use crate::db::{migrations, Database};
use crate::error::AppError;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

/// Durable store backed by the `kv_store` table.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the database at `path` and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let db = Database::open(path)?;
        migrations::run(db.connection())?;
        Ok(Self { db })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let value = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.db.connection().execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }
}
