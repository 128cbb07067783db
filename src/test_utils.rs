//! Shared test utilities.
//!
//! Setup helpers for stores, trackers and habit fixtures.

#![cfg(test)]

use crate::config::TrackerConfig;
use crate::models::{GoalType, NewHabitDefinition};
use crate::storage::{MemoryStore, SqliteStore};
use crate::tracker::HabitTracker;
use chrono::NaiveDate;
use tempfile::{tempdir, TempDir};

/// Create a temporary SQLite-backed store with migrations applied.
///
/// Returns a tuple of (SqliteStore, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the database file from being deleted.
pub fn setup_test_store() -> (SqliteStore, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let store = SqliteStore::open(&db_path).expect("Failed to open test store");
    (store, dir)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// In-memory tracker whose today (and app date) is 2025-07-16.
pub fn memory_tracker() -> HabitTracker<MemoryStore> {
    HabitTracker::with_today(MemoryStore::new(), TrackerConfig::default(), date(2025, 7, 16))
}

pub fn daily_habit(name: &str) -> NewHabitDefinition {
    NewHabitDefinition {
        name: name.into(),
        goal_type: Some(GoalType::Daily),
        ..NewHabitDefinition::default()
    }
}

pub fn cumulative_habit(name: &str, goal_amount: f64, increment_amount: f64) -> NewHabitDefinition {
    NewHabitDefinition {
        name: name.into(),
        goal_type: Some(GoalType::Cumulative),
        measurement: "miles".into(),
        goal_amount,
        increment_amount,
    }
}
