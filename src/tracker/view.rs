use super::HabitTracker;
use crate::aggregate::{compose_view, monthly_progress, MonthlyProgress, TrackerView, ViewInputs};
use crate::dates::{elapsed_days, DateInfo};
use crate::error::AppError;
use crate::models::HabitDefinition;
use crate::storage::KeyValueStore;
use crate::validation::{validate_goal_id, validate_year_month_format};
use log::error;

impl<S: KeyValueStore> HabitTracker<S> {
    fn try_monthly_progress(
        &self,
        goal_id: &str,
        habit_def_id: &str,
        year_month: &str,
    ) -> Result<MonthlyProgress, AppError> {
        validate_year_month_format(year_month)?;
        validate_goal_id(goal_id)?;

        let catalog = self.load_catalog()?;
        let definition = HabitDefinition::find(&catalog, habit_def_id)
            .ok_or_else(|| AppError::not_found("habit definition", habit_def_id))?;
        let entries = self.try_progress_for_month(year_month)?;
        let elapsed = elapsed_days(year_month, self.today)?;

        Ok(monthly_progress(definition, goal_id, &entries, elapsed))
    }

    fn try_tracker_view(&self) -> Result<TrackerView, AppError> {
        let date = DateInfo::from_date(self.view_date());
        let tracked = self.try_tracked(&date.year_month)?;
        let month_entries = self.try_progress_for_month(&date.year_month)?;
        let elapsed = elapsed_days(&date.year_month, self.today)?;

        Ok(compose_view(ViewInputs {
            editable: self.is_editable(date.naive),
            elapsed_days: elapsed,
            tracked: &tracked,
            month_entries: &month_entries,
            date,
        }))
    }

    /// Month-to-date progress of one enrolled goal.
    pub fn get_monthly_progress(&self, goal_id: &str, habit_def_id: &str, year_month: &str) -> Option<MonthlyProgress> {
        self.try_monthly_progress(goal_id, habit_def_id, year_month)
            .map_err(|e| error!("Failed to compute monthly progress for {goal_id}: {e}"))
            .ok()
    }

    /// Today and month-to-date rows for every habit tracked in the month of
    /// the view date.
    pub fn get_tracker_view(&self) -> Option<TrackerView> {
        self.try_tracker_view()
            .map_err(|e| error!("Failed to build tracker view: {e}"))
            .ok()
    }
}
