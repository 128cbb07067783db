pub mod aggregate;
pub mod config;
pub mod constants;
pub mod dates;
pub mod db;
pub mod error;
pub mod models;
pub mod native_host;
pub mod storage;
#[cfg(test)]
mod test_utils;
pub mod tracker;
pub mod validation;

use crate::config::TrackerConfig;
use crate::error::AppError;
use crate::storage::SqliteStore;
use crate::tracker::HabitTracker;
use directories::ProjectDirs;
use std::path::PathBuf;

/// Error type for startup failures
#[derive(Debug)]
pub enum InitError {
    NoProjectDirs,
    DataDirCreation(std::io::Error),
    StoreOpen(AppError),
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InitError::NoProjectDirs => write!(f, "Could not determine project directories"),
            InitError::DataDirCreation(e) => write!(f, "Could not create data directory: {e}"),
            InitError::StoreOpen(e) => write!(f, "Failed to open habit store: {e}"),
        }
    }
}

impl std::error::Error for InitError {}

/// Path of the habit database, creating the data directory if needed.
pub fn get_db_path() -> Result<PathBuf, InitError> {
    let proj_dirs = ProjectDirs::from("com", "dailylife", "DailyLife").ok_or(InitError::NoProjectDirs)?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir).map_err(InitError::DataDirCreation)?;
    Ok(data_dir.join("dailylife.db"))
}

/// Tracker over the SQLite store in the user's data directory.
pub fn open_default_tracker(config: TrackerConfig) -> Result<HabitTracker<SqliteStore>, InitError> {
    let db_path = get_db_path()?;
    log::info!("Opening habit store at {}", db_path.display());
    let store = SqliteStore::open(&db_path).map_err(InitError::StoreOpen)?;
    Ok(HabitTracker::new(store, config))
}
