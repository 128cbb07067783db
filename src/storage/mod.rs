//! Key-value persistence boundary.
//!
//! Every record collection is stored as one JSON array under one key, the
//! same layout the browser dashboard keeps in local storage.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub trait KeyValueStore {
    /// Raw value under `key`, or None when the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Load the JSON array stored under `key`. A missing key is an empty list.
pub fn load_records<S, T>(store: &S, key: &str) -> Result<Vec<T>, AppError>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Replace the JSON array stored under `key`.
pub fn save_records<S, T>(store: &S, key: &str, records: &[T]) -> Result<(), AppError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let raw = serde_json::to_string(records)?;
    store.set(key, &raw)
}
