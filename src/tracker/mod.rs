//! The owning context for habit tracking.
//!
//! `HabitTracker` holds the store, the key layout and the date context
//! (today, the app's reference date and an optional selected date). Every
//! public operation is a boundary: failures are logged and turned into a
//! sentinel (`false`, an empty list or `None`) instead of being returned.

mod goals;
mod habits;
mod progress;
mod view;

use crate::config::TrackerConfig;
use crate::dates::DateInfo;
use crate::storage::KeyValueStore;
use chrono::{Local, NaiveDate};

pub struct HabitTracker<S: KeyValueStore> {
    store: S,
    config: TrackerConfig,
    today: NaiveDate,
    app_date: DateInfo,
    selected_date: Option<NaiveDate>,
}

impl<S: KeyValueStore> HabitTracker<S> {
    /// Tracker anchored on the local calendar date.
    pub fn new(store: S, config: TrackerConfig) -> Self {
        Self::with_today(store, config, Local::now().date_naive())
    }

    /// Tracker with an explicit "today", which is also the initial app date.
    pub fn with_today(store: S, config: TrackerConfig, today: NaiveDate) -> Self {
        Self {
            store,
            config,
            today,
            app_date: DateInfo::from_date(today),
            selected_date: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn app_date(&self) -> &DateInfo {
        &self.app_date
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// Move the app's reference date, e.g. when the calendar changes month.
    /// The new date also becomes the selected date, so the day on screen is
    /// the day edits land on.
    pub fn set_app_date(&mut self, date: NaiveDate) {
        self.app_date = DateInfo::from_date(date);
        self.selected_date = Some(date);
    }

    /// Select a calendar day for progress edits, or clear the selection.
    pub fn select_date(&mut self, date: Option<NaiveDate>) {
        log::debug!("Selected habit date: {date:?}");
        self.selected_date = date;
    }

    /// Date that toggle, increment and decrement act on.
    pub fn action_date(&self) -> NaiveDate {
        self.selected_date.unwrap_or(self.today)
    }

    /// Date the tracker view is composed for.
    pub fn view_date(&self) -> NaiveDate {
        self.selected_date.unwrap_or(self.app_date.naive)
    }

    /// Days after today cannot be checked off yet.
    pub fn is_editable(&self, date: NaiveDate) -> bool {
        date <= self.today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_utils::date;

    #[test]
    fn test_dates_default_to_today() {
        let tracker = HabitTracker::with_today(MemoryStore::new(), TrackerConfig::default(), date(2025, 7, 16));
        assert_eq!(tracker.action_date(), date(2025, 7, 16));
        assert_eq!(tracker.view_date(), date(2025, 7, 16));
        assert_eq!(tracker.app_date().year_month, "2025-07");
    }

    #[test]
    fn test_selected_date_overrides_action_and_view() {
        let mut tracker = HabitTracker::with_today(MemoryStore::new(), TrackerConfig::default(), date(2025, 7, 16));
        tracker.select_date(Some(date(2025, 7, 3)));
        assert_eq!(tracker.action_date(), date(2025, 7, 3));
        assert_eq!(tracker.view_date(), date(2025, 7, 3));

        tracker.select_date(None);
        assert_eq!(tracker.action_date(), date(2025, 7, 16));
    }

    #[test]
    fn test_month_change_moves_view_and_edits_together() {
        let mut tracker = HabitTracker::with_today(MemoryStore::new(), TrackerConfig::default(), date(2025, 7, 16));
        tracker.add_habit_definition(crate::test_utils::daily_habit("Floss"));
        tracker.set_app_date(date(2025, 6, 1));
        assert_eq!(tracker.action_date(), date(2025, 6, 1));
        assert_eq!(tracker.view_date(), date(2025, 6, 1));

        tracker.enroll_habit("habitDefinition-0001");
        assert!(tracker.toggle_daily_habit("goal-0001"));

        let view = tracker.get_tracker_view().unwrap();
        assert_eq!(view.date.date, "2025-06-01");
        assert_eq!(view.today[0].state, crate::aggregate::TodayState::Checkbox { checked: true });
        assert!(tracker.get_progress_for_date("2025-07-16", None).is_empty());
    }

    #[test]
    fn test_state_survives_reopening_sqlite_store() {
        let (store, dir) = crate::test_utils::setup_test_store();
        let tracker = HabitTracker::with_today(store, TrackerConfig::default(), date(2025, 7, 16));
        tracker.add_habit_definition(crate::test_utils::daily_habit("Floss"));
        tracker.enroll_habit("habitDefinition-0001");
        tracker.toggle_daily_habit("goal-0001");
        drop(tracker);

        let store = crate::storage::SqliteStore::open(&dir.path().join("test.db")).unwrap();
        let tracker = HabitTracker::with_today(store, TrackerConfig::default(), date(2025, 7, 16));
        assert_eq!(tracker.get_tracked_habit_definitions(None).len(), 1);
        assert_eq!(tracker.get_progress_for_date("2025-07-16", None).len(), 1);
    }

    #[test]
    fn test_future_dates_are_not_editable() {
        let tracker = HabitTracker::with_today(MemoryStore::new(), TrackerConfig::default(), date(2025, 7, 16));
        assert!(tracker.is_editable(date(2025, 7, 16)));
        assert!(tracker.is_editable(date(2025, 6, 30)));
        assert!(!tracker.is_editable(date(2025, 7, 17)));
    }
}
