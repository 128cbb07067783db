use crate::constants::GOAL_ID_PREFIX;
use crate::error::AppError;
use crate::models::{format_id, id_suffix, GoalType, HabitDefinition};
use crate::storage::{load_records, save_records, KeyValueStore};
use serde::{Deserialize, Serialize};

/// Enrollment of a habit definition into one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyGoal {
    pub id: String,
    pub habit_def_id: String,
    pub year_month: String,
    #[serde(default)]
    pub updated_at: String,
}

/// A monthly goal joined with its habit definition. When the definition is
/// gone the text fields are empty and the numeric fields are None.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedGoal {
    pub id: String,
    pub habit_def_id: String,
    pub year_month: String,
    pub name: String,
    pub goal_type: Option<GoalType>,
    pub goal_amount: Option<f64>,
    pub increment_amount: Option<f64>,
    pub measurement: String,
}

fn is_goal_id(id: &str) -> bool {
    id.strip_prefix(GOAL_ID_PREFIX).is_some_and(|rest| rest.starts_with('-'))
}

impl MonthlyGoal {
    /// Next id above every goal id the year has used. `referenced` carries
    /// goal ids still named by progress entries after their goal was removed,
    /// so a new goal never inherits orphaned progress.
    pub fn next_id<'a>(year_goals: &'a [Self], referenced: impl IntoIterator<Item = &'a str>) -> String {
        let highest = year_goals
            .iter()
            .map(|g| g.id.as_str())
            .chain(referenced)
            .filter(|id| is_goal_id(id))
            .filter_map(id_suffix)
            .max()
            .unwrap_or(0);
        format_id(GOAL_ID_PREFIX, highest.saturating_add(1))
    }

    pub fn in_month<'a>(year_goals: &'a [Self], year_month: &'a str) -> impl Iterator<Item = &'a Self> {
        year_goals.iter().filter(move |g| g.year_month == year_month)
    }

    pub fn enrich(&self, catalog: &[HabitDefinition]) -> EnrichedGoal {
        let def = HabitDefinition::find(catalog, &self.habit_def_id);
        EnrichedGoal {
            id: self.id.clone(),
            habit_def_id: self.habit_def_id.clone(),
            year_month: self.year_month.clone(),
            name: def.map(|d| d.name.clone()).unwrap_or_default(),
            goal_type: def.map(|d| d.goal_type),
            goal_amount: def.map(|d| d.goal_amount),
            increment_amount: def.map(|d| d.increment_amount),
            measurement: def.map(|d| d.measurement.clone()).unwrap_or_default(),
        }
    }

    pub fn load_year<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Vec<Self>, AppError> {
        load_records(store, key)
    }

    pub fn save_year<S: KeyValueStore + ?Sized>(store: &S, key: &str, goals: &[Self]) -> Result<(), AppError> {
        save_records(store, key, goals)
    }
}
