use crate::constants::PROGRESS_ID_PREFIX;
use crate::error::AppError;
use crate::models::next_sequential_id;
use crate::storage::{load_records, save_records, KeyValueStore};
use serde::{Deserialize, Serialize};

/// One dated record of work against a monthly goal.
///
/// `daily_value` is 1 for a daily habit and the number of increments for a
/// cumulative one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: String,
    pub habit_month_goal_id: String,
    pub date: String,
    pub daily_value: u32,
    #[serde(default)]
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgressEntry {
    pub habit_month_goal_id: String,
    /// `YYYY-MM-DD`; None means the current app date.
    #[serde(default)]
    pub date: Option<String>,
    pub daily_value: u32,
}

impl ProgressEntry {
    pub fn next_id(month_entries: &[Self]) -> String {
        next_sequential_id(
            PROGRESS_ID_PREFIX,
            month_entries.last().map(|e| e.id.as_str()),
            month_entries.len(),
        )
    }

    /// Sum of `daily_value` over the entries of one goal.
    pub fn total_for_goal(entries: &[Self], goal_id: &str) -> u32 {
        entries
            .iter()
            .filter(|e| e.habit_month_goal_id == goal_id)
            .fold(0u32, |sum, e| sum.saturating_add(e.daily_value))
    }

    pub fn load_month<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Vec<Self>, AppError> {
        load_records(store, key)
    }

    pub fn save_month<S: KeyValueStore + ?Sized>(store: &S, key: &str, entries: &[Self]) -> Result<(), AppError> {
        save_records(store, key, entries)
    }
}
