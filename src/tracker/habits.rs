use super::HabitTracker;
use crate::dates::timestamp_now;
use crate::error::AppError;
use crate::models::{HabitDefinition, HabitDefinitionPatch, HabitDraft, MonthlyGoal, NewHabitDefinition};
use crate::storage::KeyValueStore;
use crate::validation::{validate_habit_definition, ValidationReport};
use log::{debug, error, warn};

const SAVE_FAILED: &str = "Failed to save habit definition";

impl<S: KeyValueStore> HabitTracker<S> {
    pub(crate) fn load_catalog(&self) -> Result<Vec<HabitDefinition>, AppError> {
        HabitDefinition::load_all(&self.store, self.config.keys.catalog())
    }

    fn save_catalog(&self, catalog: &[HabitDefinition]) -> Result<(), AppError> {
        HabitDefinition::save_all(&self.store, self.config.keys.catalog(), catalog)
    }

    fn try_add_habit_definition(&self, new: NewHabitDefinition) -> Result<String, AppError> {
        let mut catalog = self.load_catalog()?;
        let id = HabitDefinition::next_id(&catalog);
        catalog.push(HabitDefinition::from_new(id.clone(), new, timestamp_now()));
        self.save_catalog(&catalog)?;
        Ok(id)
    }

    fn try_update_habit_definition(&self, id: &str, patch: HabitDefinitionPatch) -> Result<(), AppError> {
        let mut catalog = self.load_catalog()?;
        let def = catalog
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found("habit definition", id))?;

        if let Some(goal_type) = patch.goal_type {
            if goal_type != def.goal_type && self.is_enrolled_in_app_month(id) {
                warn!(
                    "Changing goal type of {id} from {} to {} while it is tracked in {}",
                    def.goal_type.as_str(),
                    goal_type.as_str(),
                    self.app_date.year_month
                );
            }
        }

        def.apply_patch(patch, timestamp_now());
        self.save_catalog(&catalog)
    }

    fn is_enrolled_in_app_month(&self, habit_def_id: &str) -> bool {
        let key = self.config.keys.goals(self.app_date.year);
        MonthlyGoal::load_year(&self.store, &key)
            .map(|goals| {
                MonthlyGoal::in_month(&goals, &self.app_date.year_month).any(|g| g.habit_def_id == habit_def_id)
            })
            .unwrap_or(false)
    }

    fn set_active(&self, id: &str, is_active: bool) -> Result<(), AppError> {
        self.try_update_habit_definition(
            id,
            HabitDefinitionPatch {
                is_active: Some(is_active),
                ..HabitDefinitionPatch::default()
            },
        )
    }

    pub fn add_habit_definition(&self, new: NewHabitDefinition) -> bool {
        match self.try_add_habit_definition(new) {
            Ok(id) => {
                debug!("Added habit definition {id}");
                true
            }
            Err(e) => {
                error!("Failed to add habit definition: {e}");
                false
            }
        }
    }

    pub fn update_habit_definition(&self, id: &str, patch: HabitDefinitionPatch) -> bool {
        match self.try_update_habit_definition(id, patch) {
            Ok(()) => {
                debug!("Updated habit definition {id}");
                true
            }
            Err(e) => {
                error!("Failed to update habit definition: {e}");
                false
            }
        }
    }

    /// Soft delete: the definition stays in the catalog as inactive.
    pub fn delete_habit_definition(&self, id: &str) -> bool {
        match self.set_active(id, false) {
            Ok(()) => {
                debug!("Deactivated habit definition {id}");
                true
            }
            Err(e) => {
                error!("Failed to delete habit definition: {e}");
                false
            }
        }
    }

    pub fn restore_habit_definition(&self, id: &str) -> bool {
        match self.set_active(id, true) {
            Ok(()) => {
                debug!("Restored habit definition {id}");
                true
            }
            Err(e) => {
                error!("Failed to restore habit definition: {e}");
                false
            }
        }
    }

    pub fn get_habit_definition(&self, id: &str) -> Option<HabitDefinition> {
        match self.load_catalog() {
            Ok(catalog) => catalog.into_iter().find(|d| d.id == id),
            Err(e) => {
                error!("Failed to load habit definitions: {e}");
                None
            }
        }
    }

    /// Active definitions, daily first then by name. Reloaded on every call.
    pub fn get_active_habit_definitions(&self) -> Vec<HabitDefinition> {
        let mut active = self.definitions_where(true);
        HabitDefinition::sort_for_display(&mut active);
        active
    }

    pub fn get_inactive_habit_definitions(&self) -> Vec<HabitDefinition> {
        self.definitions_where(false)
    }

    fn definitions_where(&self, is_active: bool) -> Vec<HabitDefinition> {
        match self.load_catalog() {
            Ok(catalog) => catalog.into_iter().filter(|d| d.is_active == is_active).collect(),
            Err(e) => {
                error!("Failed to load habit definitions: {e}");
                Vec::new()
            }
        }
    }

    pub fn validate_habit_definition(&self, draft: &HabitDraft) -> ValidationReport {
        validate_habit_definition(draft)
    }

    /// Validate a habit form and save it, as a new definition or over
    /// `editing_id`. Returns the error messages to show on failure.
    pub fn submit_habit_definition(&self, draft: &HabitDraft, editing_id: Option<&str>) -> Result<(), Vec<String>> {
        let report = validate_habit_definition(draft);
        if !report.is_valid {
            return Err(report.errors);
        }

        let saved = match editing_id {
            Some(id) => self.update_habit_definition(id, draft.to_patch()),
            None => self.add_habit_definition(draft.to_new_definition()),
        };
        if saved {
            Ok(())
        } else {
            Err(vec![SAVE_FAILED.to_string()])
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{GoalType, HabitDefinitionPatch, HabitDraft, NewHabitDefinition};
    use crate::storage::{KeyValueStore, MemoryStore};
    use crate::test_utils::{cumulative_habit, daily_habit, memory_tracker};

    #[test]
    fn test_add_assigns_contiguous_ids() {
        let tracker = memory_tracker();
        for name in ["A", "B", "C", "D"] {
            assert!(tracker.add_habit_definition(daily_habit(name)));
        }
        let mut ids: Vec<String> = tracker.get_active_habit_definitions().into_iter().map(|d| d.id).collect();
        ids.sort();
        assert_eq!(
            ids,
            vec![
                "habitDefinition-0001",
                "habitDefinition-0002",
                "habitDefinition-0003",
                "habitDefinition-0004"
            ]
        );
    }

    #[test]
    fn test_add_defaults_goal_type_to_daily() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(NewHabitDefinition {
            name: "Stretch".into(),
            ..NewHabitDefinition::default()
        });
        let def = tracker.get_habit_definition("habitDefinition-0001").unwrap();
        assert_eq!(def.goal_type, GoalType::Daily);
        assert!(def.is_active);
        assert!(!def.created_at.is_empty());
    }

    #[test]
    fn test_add_reports_persistence_failure() {
        let tracker = crate::tracker::HabitTracker::with_today(
            MemoryStore::with_quota(16),
            crate::config::TrackerConfig::default(),
            crate::test_utils::date(2025, 7, 16),
        );
        assert!(!tracker.add_habit_definition(daily_habit("Floss every single day")));
        assert!(tracker.get_active_habit_definitions().is_empty());
    }

    #[test]
    fn test_update_missing_returns_false() {
        let tracker = memory_tracker();
        assert!(!tracker.update_habit_definition("habitDefinition-0042", HabitDefinitionPatch::default()));
        assert!(!tracker.delete_habit_definition("habitDefinition-0042"));
    }

    #[test]
    fn test_update_applies_explicit_zero() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(cumulative_habit("Run", 20.0, 1.0));
        assert!(tracker.update_habit_definition(
            "habitDefinition-0001",
            HabitDefinitionPatch {
                goal_amount: Some(0.0),
                ..HabitDefinitionPatch::default()
            }
        ));
        let def = tracker.get_habit_definition("habitDefinition-0001").unwrap();
        assert_eq!(def.goal_amount, 0.0);
        assert_eq!(def.name, "Run");
        assert!(def.updated_at.is_some());
    }

    #[test]
    fn test_goal_type_change_on_tracked_habit_is_applied() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(daily_habit("Floss"));
        assert!(tracker.enroll_habit("habitDefinition-0001"));
        assert!(tracker.update_habit_definition(
            "habitDefinition-0001",
            HabitDefinitionPatch {
                goal_type: Some(GoalType::Cumulative),
                ..HabitDefinitionPatch::default()
            }
        ));
        let def = tracker.get_habit_definition("habitDefinition-0001").unwrap();
        assert_eq!(def.goal_type, GoalType::Cumulative);
    }

    #[test]
    fn test_delete_then_restore_only_changes_timestamp() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(cumulative_habit("Run", 20.0, 0.5));
        let original = tracker.get_habit_definition("habitDefinition-0001").unwrap();

        assert!(tracker.delete_habit_definition("habitDefinition-0001"));
        assert!(tracker.get_active_habit_definitions().is_empty());
        assert_eq!(tracker.get_inactive_habit_definitions().len(), 1);

        assert!(tracker.restore_habit_definition("habitDefinition-0001"));
        let mut restored = tracker.get_habit_definition("habitDefinition-0001").unwrap();
        assert!(restored.is_active);
        assert!(restored.updated_at.is_some());
        restored.updated_at = original.updated_at.clone();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_active_definitions_are_sorted_and_fresh() {
        let tracker = memory_tracker();
        tracker.add_habit_definition(cumulative_habit("Walk", 10.0, 1.0));
        tracker.add_habit_definition(daily_habit("Meditate"));
        tracker.add_habit_definition(daily_habit("Floss"));

        let names: Vec<String> = tracker.get_active_habit_definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Floss", "Meditate", "Walk"]);

        // Another writer replaces the catalog behind the tracker's back
        tracker.store().set("dailyLifeHabitDefinitions", "[]").unwrap();
        assert!(tracker.get_active_habit_definitions().is_empty());
    }

    #[test]
    fn test_corrupt_catalog_degrades_to_empty() {
        let tracker = memory_tracker();
        tracker.store().set("dailyLifeHabitDefinitions", "{not json").unwrap();
        assert!(tracker.get_active_habit_definitions().is_empty());
        assert!(tracker.get_habit_definition("habitDefinition-0001").is_none());
        assert!(!tracker.add_habit_definition(daily_habit("Floss")));
    }

    #[test]
    fn test_submit_reports_validation_errors() {
        let tracker = memory_tracker();
        let draft = HabitDraft {
            goal_type: "cumulative".into(),
            increment_amount: 5.0,
            ..HabitDraft::default()
        };
        let errors = tracker.submit_habit_definition(&draft, None).unwrap_err();
        assert!(errors.len() >= 4);
        assert!(tracker.get_active_habit_definitions().is_empty());
    }

    #[test]
    fn test_submit_adds_then_edits() {
        let tracker = memory_tracker();
        let mut draft = HabitDraft {
            name: "Read".into(),
            goal_type: "cumulative".into(),
            measurement: "pages".into(),
            goal_amount: 300.0,
            increment_amount: 10.0,
        };
        tracker.submit_habit_definition(&draft, None).unwrap();

        draft.goal_amount = 400.0;
        tracker.submit_habit_definition(&draft, Some("habitDefinition-0001")).unwrap();

        let defs = tracker.get_active_habit_definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].goal_amount, 400.0);
    }

    #[test]
    fn test_submit_edit_of_missing_habit_fails_to_save() {
        let tracker = memory_tracker();
        let draft = HabitDraft {
            name: "Read".into(),
            goal_type: "daily".into(),
            ..HabitDraft::default()
        };
        let errors = tracker.submit_habit_definition(&draft, Some("habitDefinition-0009")).unwrap_err();
        assert_eq!(errors, vec!["Failed to save habit definition".to_string()]);
    }
}
