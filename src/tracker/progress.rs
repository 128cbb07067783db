use super::HabitTracker;
use crate::config::LedgerScope;
use crate::dates::{date_string, parse_date, timestamp_now, year_month_of};
use crate::error::AppError;
use crate::models::{NewProgressEntry, ProgressEntry};
use crate::storage::KeyValueStore;
use crate::validation::validate_year_month_format;
use log::{debug, error};

impl<S: KeyValueStore> HabitTracker<S> {
    pub(crate) fn try_progress_for_month(&self, year_month: &str) -> Result<Vec<ProgressEntry>, AppError> {
        validate_year_month_format(year_month)?;
        ProgressEntry::load_month(&self.store, &self.config.keys.progress(year_month))
    }

    fn save_month(&self, year_month: &str, entries: &[ProgressEntry]) -> Result<(), AppError> {
        ProgressEntry::save_month(&self.store, &self.config.keys.progress(year_month), entries)
    }

    fn try_save_entry(&self, entry: NewProgressEntry) -> Result<String, AppError> {
        let date = match entry.date.as_deref() {
            Some(date) => parse_date(date)?,
            None => self.app_date.naive,
        };
        let year_month = year_month_of(date);

        let mut entries = self.try_progress_for_month(&year_month)?;
        let id = ProgressEntry::next_id(&entries);
        entries.push(ProgressEntry {
            id: id.clone(),
            habit_month_goal_id: entry.habit_month_goal_id,
            date: date_string(date),
            daily_value: entry.daily_value,
            updated_at: timestamp_now(),
        });
        self.save_month(&year_month, &entries)?;
        Ok(id)
    }

    fn try_update_entry(&self, year_month: &str, id: &str, daily_value: u32) -> Result<(), AppError> {
        let mut entries = self.try_progress_for_month(year_month)?;
        let entry = entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| AppError::not_found("progress entry", id))?;
        entry.daily_value = daily_value;
        entry.updated_at = timestamp_now();
        self.save_month(year_month, &entries)
    }

    fn try_remove_entry(&self, year_month: &str, id: &str) -> Result<(), AppError> {
        let mut entries = self.try_progress_for_month(year_month)?;
        entries.retain(|e| e.id != id);
        self.save_month(year_month, &entries)
    }

    /// Month whose ledger an in-place update edits.
    fn update_scope_month(&self) -> String {
        match self.config.ledger_scope {
            LedgerScope::TargetMonth => year_month_of(self.action_date()),
            LedgerScope::AppMonth => self.app_date.year_month.clone(),
        }
    }

    /// The goal's entry on the action date, along with that date's month.
    fn entry_on_action_date(&self, goal_id: &str) -> (String, Option<ProgressEntry>) {
        let date = self.action_date();
        let year_month = year_month_of(date);
        let month = self.get_progress_for_month(&year_month);
        let day = self.get_progress_for_date(&date_string(date), Some(&month));
        let entry = day.into_iter().find(|e| e.habit_month_goal_id == goal_id);
        (year_month, entry)
    }

    /// Every entry of `year_month`. Empty when absent or unreadable.
    pub fn get_progress_for_month(&self, year_month: &str) -> Vec<ProgressEntry> {
        self.try_progress_for_month(year_month).unwrap_or_else(|e| {
            error!("Failed to load progress for {year_month}: {e}");
            Vec::new()
        })
    }

    /// Entries dated `date`, read from `month_entries` when the caller already
    /// holds that month, else loaded.
    pub fn get_progress_for_date(&self, date: &str, month_entries: Option<&[ProgressEntry]>) -> Vec<ProgressEntry> {
        let parsed = match parse_date(date) {
            Ok(parsed) => parsed,
            Err(e) => {
                error!("Invalid progress date: {e}");
                return Vec::new();
            }
        };

        let on_date = |entries: &[ProgressEntry]| -> Vec<ProgressEntry> {
            entries.iter().filter(|e| e.date == date).cloned().collect()
        };
        match month_entries {
            Some(entries) => on_date(entries),
            None => on_date(&self.get_progress_for_month(&year_month_of(parsed))),
        }
    }

    /// Append an entry to the ledger of its date's month. A missing date
    /// means the app date.
    pub fn save_progress_entry(&self, entry: NewProgressEntry) -> bool {
        match self.try_save_entry(entry) {
            Ok(id) => {
                debug!("Saved progress entry {id}");
                true
            }
            Err(e) => {
                error!("Failed to save progress entry: {e}");
                false
            }
        }
    }

    /// Set an entry's value in the month chosen by the configured `LedgerScope`.
    pub fn update_progress_entry(&self, id: &str, daily_value: u32) -> bool {
        self.update_progress_entry_in(&self.update_scope_month(), id, daily_value)
    }

    pub fn update_progress_entry_in(&self, year_month: &str, id: &str, daily_value: u32) -> bool {
        match self.try_update_entry(year_month, id, daily_value) {
            Ok(()) => {
                debug!("Updated progress entry {id} in {year_month} to {daily_value}");
                true
            }
            Err(e) => {
                error!("Failed to update progress entry: {e}");
                false
            }
        }
    }

    pub fn remove_progress_entry(&self, id: &str, year_month: &str) -> bool {
        match self.try_remove_entry(year_month, id) {
            Ok(()) => {
                debug!("Removed progress entry {id} from {year_month}");
                true
            }
            Err(e) => {
                error!("Failed to remove progress entry: {e}");
                false
            }
        }
    }

    /// Flip a daily habit's completion on the action date.
    pub fn toggle_daily_habit(&self, goal_id: &str) -> bool {
        match self.entry_on_action_date(goal_id) {
            (year_month, Some(entry)) => self.remove_progress_entry(&entry.id, &year_month),
            (_, None) => self.save_progress_entry(NewProgressEntry {
                habit_month_goal_id: goal_id.to_string(),
                date: Some(date_string(self.action_date())),
                daily_value: 1,
            }),
        }
    }

    /// Add one increment to a cumulative habit on the action date.
    pub fn increment_habit(&self, goal_id: &str) -> bool {
        match self.entry_on_action_date(goal_id) {
            (_, Some(entry)) => self.update_progress_entry(&entry.id, entry.daily_value.saturating_add(1)),
            (_, None) => self.save_progress_entry(NewProgressEntry {
                habit_month_goal_id: goal_id.to_string(),
                date: Some(date_string(self.action_date())),
                daily_value: 1,
            }),
        }
    }

    /// Take one increment away. The entry disappears when it would reach
    /// zero; with no entry there is nothing to do.
    pub fn decrement_habit(&self, goal_id: &str) -> bool {
        match self.entry_on_action_date(goal_id) {
            (_, Some(entry)) if entry.daily_value > 1 => {
                self.update_progress_entry(&entry.id, entry.daily_value - 1)
            }
            (year_month, Some(entry)) => self.remove_progress_entry(&entry.id, &year_month),
            (_, None) => true,
        }
    }
}
