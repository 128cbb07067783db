use super::HabitTracker;
use crate::dates::{parse_year_month, timestamp_now};
use crate::error::AppError;
use crate::models::{EnrichedGoal, HabitDefinition, MonthlyGoal, ProgressEntry};
use crate::storage::KeyValueStore;
use log::{debug, error, warn};
use std::collections::HashSet;

impl<S: KeyValueStore> HabitTracker<S> {
    fn goals_key(&self, year_month: &str) -> Result<String, AppError> {
        let (year, _) = parse_year_month(year_month)?;
        Ok(self.config.keys.goals(year))
    }

    fn month_or_app<'a>(&'a self, year_month: Option<&'a str>) -> &'a str {
        year_month.unwrap_or(&self.app_date.year_month)
    }

    pub(crate) fn try_monthly_goals(&self, year_month: &str) -> Result<Vec<MonthlyGoal>, AppError> {
        let year_goals = MonthlyGoal::load_year(&self.store, &self.goals_key(year_month)?)?;
        Ok(MonthlyGoal::in_month(&year_goals, year_month).cloned().collect())
    }

    pub(crate) fn try_tracked(&self, year_month: &str) -> Result<Vec<EnrichedGoal>, AppError> {
        let goals = self.try_monthly_goals(year_month)?;
        let catalog = self.load_catalog()?;
        Ok(goals.iter().map(|g| g.enrich(&catalog)).collect())
    }

    /// Goal ids named by any progress entry of the year's twelve ledgers.
    fn goal_ids_in_progress(&self, year: i32) -> Result<Vec<String>, AppError> {
        let mut ids = Vec::new();
        for month in 1..=12 {
            let key = self.config.keys.progress(&format!("{year:04}-{month:02}"));
            ids.extend(
                ProgressEntry::load_month(&self.store, &key)?
                    .into_iter()
                    .map(|e| e.habit_month_goal_id),
            );
        }
        Ok(ids)
    }

    fn try_enroll(&self, year_month: &str, habit_def_id: &str) -> Result<Option<String>, AppError> {
        let (year, _) = parse_year_month(year_month)?;
        let key = self.config.keys.goals(year);
        let mut year_goals = MonthlyGoal::load_year(&self.store, &key)?;
        if MonthlyGoal::in_month(&year_goals, year_month).any(|g| g.habit_def_id == habit_def_id) {
            return Ok(None);
        }

        let referenced = self.goal_ids_in_progress(year)?;
        let id = MonthlyGoal::next_id(&year_goals, referenced.iter().map(String::as_str));
        year_goals.push(MonthlyGoal {
            id: id.clone(),
            habit_def_id: habit_def_id.to_string(),
            year_month: year_month.to_string(),
            updated_at: timestamp_now(),
        });
        MonthlyGoal::save_year(&self.store, &key, &year_goals)?;
        Ok(Some(id))
    }

    fn try_unenroll(&self, year_month: &str, goal_id: &str) -> Result<(), AppError> {
        let key = self.goals_key(year_month)?;
        let mut year_goals = MonthlyGoal::load_year(&self.store, &key)?;
        let before = year_goals.len();
        year_goals.retain(|g| g.id != goal_id);
        if year_goals.len() == before {
            return Err(AppError::not_found("monthly goal", goal_id));
        }
        MonthlyGoal::save_year(&self.store, &key, &year_goals)
    }

    /// Enrollments of `year_month`, default the app month.
    pub fn get_monthly_goals(&self, year_month: Option<&str>) -> Vec<MonthlyGoal> {
        let year_month = self.month_or_app(year_month);
        self.try_monthly_goals(year_month).unwrap_or_else(|e| {
            error!("Failed to load monthly goals for {year_month}: {e}");
            Vec::new()
        })
    }

    /// Enrollments of `year_month` joined with their habit definitions.
    pub fn get_tracked_habit_definitions(&self, year_month: Option<&str>) -> Vec<EnrichedGoal> {
        let year_month = self.month_or_app(year_month);
        self.try_tracked(year_month).unwrap_or_else(|e| {
            error!("Failed to load tracked habits for {year_month}: {e}");
            Vec::new()
        })
    }

    /// Active definitions not yet enrolled in `year_month`.
    pub fn get_available_habit_definitions(&self, year_month: Option<&str>) -> Vec<HabitDefinition> {
        let tracked: HashSet<String> = self
            .get_monthly_goals(year_month)
            .into_iter()
            .map(|g| g.habit_def_id)
            .collect();
        self.get_active_habit_definitions()
            .into_iter()
            .filter(|d| !tracked.contains(&d.id))
            .collect()
    }

    /// Track a habit in the app month. A habit already tracked that month
    /// is left alone and reported as a failure.
    pub fn enroll_habit(&self, habit_def_id: &str) -> bool {
        let year_month = self.app_date.year_month.as_str();
        match self.try_enroll(year_month, habit_def_id) {
            Ok(Some(goal_id)) => {
                debug!("Enrolled {habit_def_id} in {year_month} as {goal_id}");
                true
            }
            Ok(None) => {
                warn!("Habit {habit_def_id} is already tracked in {year_month}");
                false
            }
            Err(e) => {
                error!("Failed to enroll habit {habit_def_id}: {e}");
                false
            }
        }
    }

    /// Stop tracking a goal of the app month's year.
    pub fn unenroll_habit(&self, goal_id: &str) -> bool {
        match self.try_unenroll(&self.app_date.year_month, goal_id) {
            Ok(()) => {
                debug!("Removed monthly goal {goal_id}");
                true
            }
            Err(e) => {
                error!("Failed to remove monthly goal: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{GoalType, MonthlyGoal};
    use crate::storage::KeyValueStore;
    use crate::test_utils::{cumulative_habit, daily_habit, date, memory_tracker};

    #[test]
    fn test_enroll_scopes_to_app_month() {
        let mut tracker = memory_tracker();
        tracker.add_habit_definition(daily_habit("Floss"));
        assert!(tracker.enroll_habit("habitDefinition-0001"));

        let goals = tracker.get_monthly_goals(None);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, "goal-0001");
        assert_eq!(goals[0].year_month, "2025-07");

        // Nothing carries into the next month
        tracker.set_app_date(date(2025, 8, 1));
        assert!(tracker.get_monthly_goals(None).is_empty());
        assert_eq!(tracker.get_monthly_goals(Some("2025-07")).len(), 1);
    }

    #[test]
    fn test_goal_ids_continue_across_months_of_a_year() {
        let mut tracker = memory_tracker();
        tracker.add_habit_definition(daily_habit("Floss"));
        tracker.enroll_habit("habitDefinition-0001");
        tracker.set_app_date(date(2025, 8, 1));
        tracker.enroll_habit("habitDefinition-0001");

        let august = tracker.get_monthly_goals(None);
        assert_eq!(august[0].id, "goal-0002");

        let raw = tracker.store().get("dailyLifeHabitMonthGoals-2025").unwrap().unwrap();
        let year: Vec<MonthlyGoal> = serde_json::from_str(&raw).unwrap();
        assert_eq!(year.len(), 2);
    }

    #[test]
    fn test_new_year_starts_a_new_bucket() {
        let mut tracker = memory_tracker();
        tracker.add_habit_definition(daily_habit("Floss"));
        tracker.enroll_habit("habitDefinition-0001");
        tracker.set_app_date(date(2026, 1, 1));
        tracker.enroll_habit("habitDefinition-0001");
        assert_eq!(tracker.get_monthly_goals(None)[0].id, "goal-0001");
        assert!(tracker.store().get("dailyLifeHabitMonthGoals-2026").unwrap().is_some());
    }

    #[test]
    fn test_enroll_refuses_duplicate() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(daily_habit("Floss"));
        assert!(tracker.enroll_habit("habitDefinition-0001"));
        assert!(!tracker.enroll_habit("habitDefinition-0001"));
        assert_eq!(tracker.get_monthly_goals(None).len(), 1);
    }

    #[test]
    fn test_tracked_and_available_are_exclusive() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(daily_habit("Floss"));
        tracker.add_habit_definition(cumulative_habit("Run", 20.0, 1.0));
        tracker.add_habit_definition(daily_habit("Meditate"));
        tracker.enroll_habit("habitDefinition-0002");

        let tracked: Vec<String> = tracker
            .get_tracked_habit_definitions(None)
            .into_iter()
            .map(|g| g.habit_def_id)
            .collect();
        let available: Vec<String> = tracker
            .get_available_habit_definitions(None)
            .into_iter()
            .map(|d| d.id)
            .collect();

        assert_eq!(tracked, vec!["habitDefinition-0002"]);
        assert_eq!(available.len(), 2);
        for def in tracker.get_active_habit_definitions() {
            assert_ne!(tracked.contains(&def.id), available.contains(&def.id));
        }
    }

    #[test]
    fn test_tracked_view_joins_definition() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(cumulative_habit("Run", 20.0, 0.5));
        tracker.enroll_habit("habitDefinition-0001");

        let tracked = tracker.get_tracked_habit_definitions(Some("2025-07"));
        assert_eq!(tracked[0].name, "Run");
        assert_eq!(tracked[0].goal_type, Some(GoalType::Cumulative));
        assert_eq!(tracked[0].goal_amount, Some(20.0));
    }

    #[test]
    fn test_tracked_view_tolerates_dangling_definition() {
        let tracker = memory_tracker();
        tracker.enroll_habit("habitDefinition-0077");
        let tracked = tracker.get_tracked_habit_definitions(None);
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0].name, "");
        assert_eq!(tracked[0].goal_type, None);
    }

    #[test]
    fn test_unenroll_removes_only_that_goal() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(daily_habit("Floss"));
        tracker.add_habit_definition(daily_habit("Meditate"));
        tracker.enroll_habit("habitDefinition-0001");
        tracker.enroll_habit("habitDefinition-0002");

        assert!(tracker.unenroll_habit("goal-0001"));
        let goals = tracker.get_monthly_goals(None);
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0].id, "goal-0002");

        assert!(!tracker.unenroll_habit("goal-0001"));
        // The definition itself survives
        assert!(tracker.get_habit_definition("habitDefinition-0001").is_some());
    }

    #[test]
    fn test_reenrolling_after_unenroll_does_not_inherit_progress() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(daily_habit("Floss"));
        tracker.add_habit_definition(cumulative_habit("Run", 10.0, 2.0));
        tracker.enroll_habit("habitDefinition-0001");
        tracker.toggle_daily_habit("goal-0001");
        assert!(tracker.unenroll_habit("goal-0001"));

        assert!(tracker.enroll_habit("habitDefinition-0002"));
        let tracked = tracker.get_tracked_habit_definitions(None);
        assert_eq!(tracked.len(), 1);
        assert_ne!(tracked[0].id, "goal-0001");

        let progress = tracker
            .get_monthly_progress(&tracked[0].id, "habitDefinition-0002", "2025-07")
            .unwrap();
        assert_eq!(progress.completed_progress, 0);
        let view = tracker.get_tracker_view().unwrap();
        assert_eq!(view.month[0].value, 0.0);
    }

    #[test]
    fn test_bad_month_degrades_to_empty() {
        let tracker = memory_tracker();
        assert!(tracker.get_monthly_goals(Some("July")).is_empty());
        assert!(tracker.get_tracked_habit_definitions(Some("2025-13")).is_empty());
    }
}
