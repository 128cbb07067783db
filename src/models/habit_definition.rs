use crate::constants::HABIT_DEFINITION_ID_PREFIX;
use crate::error::AppError;
use crate::models::format_id;
use crate::storage::{load_records, save_records, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// Done or not done each day. Older catalogs stored this as "binary".
    #[default]
    #[serde(alias = "binary")]
    Daily,
    Cumulative,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Daily => "daily",
            GoalType::Cumulative => "cumulative",
        }
    }
}

impl FromStr for GoalType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(GoalType::Daily),
            "cumulative" => Ok(GoalType::Cumulative),
            other => Err(AppError::InvalidInput {
                field: "goal_type",
                reason: format!("must be 'daily' or 'cumulative', got '{other}'"),
            }),
        }
    }
}

#[allow(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "float to int casts saturate; callers pass positive whole numbers"
)]
fn whole_to_u32(value: f64) -> u32 {
    value as u32
}

/// A habit the user could track. Retired habits stay in the catalog with
/// `is_active == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub goal_type: GoalType,
    #[serde(default)]
    pub measurement: String,
    #[serde(default)]
    pub goal_amount: f64,
    #[serde(default)]
    pub increment_amount: f64,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Fields for a new catalog entry. A missing goal type means daily.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewHabitDefinition {
    pub name: String,
    pub goal_type: Option<GoalType>,
    pub measurement: String,
    pub goal_amount: f64,
    pub increment_amount: f64,
}

/// Partial update. `None` leaves a field alone; `Some` always applies, so
/// clearing a value to zero or `false` is distinguishable from omitting it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HabitDefinitionPatch {
    pub name: Option<String>,
    pub goal_type: Option<GoalType>,
    pub measurement: Option<String>,
    pub goal_amount: Option<f64>,
    pub increment_amount: Option<f64>,
    pub is_active: Option<bool>,
}

/// Raw habit form input, validated before it becomes a definition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HabitDraft {
    pub name: String,
    pub goal_type: String,
    pub measurement: String,
    pub goal_amount: f64,
    pub increment_amount: f64,
}

impl HabitDraft {
    pub fn to_new_definition(&self) -> NewHabitDefinition {
        NewHabitDefinition {
            name: self.name.trim().to_string(),
            goal_type: self.goal_type.trim().parse().ok(),
            measurement: self.measurement.trim().to_string(),
            goal_amount: self.goal_amount,
            increment_amount: self.increment_amount,
        }
    }

    /// Every form field is explicit, so every field is part of the patch.
    pub fn to_patch(&self) -> HabitDefinitionPatch {
        HabitDefinitionPatch {
            name: Some(self.name.trim().to_string()),
            goal_type: self.goal_type.trim().parse().ok(),
            measurement: Some(self.measurement.trim().to_string()),
            goal_amount: Some(self.goal_amount),
            increment_amount: Some(self.increment_amount),
            is_active: None,
        }
    }
}

impl HabitDefinition {
    pub fn from_new(id: String, new: NewHabitDefinition, now: String) -> Self {
        Self {
            id,
            name: new.name,
            goal_type: new.goal_type.unwrap_or_default(),
            measurement: new.measurement,
            goal_amount: new.goal_amount,
            increment_amount: new.increment_amount,
            is_active: true,
            created_at: now,
            updated_at: None,
        }
    }

    pub fn apply_patch(&mut self, patch: HabitDefinitionPatch, now: String) {
        let HabitDefinitionPatch {
            name,
            goal_type,
            measurement,
            goal_amount,
            increment_amount,
            is_active,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(goal_type) = goal_type {
            self.goal_type = goal_type;
        }
        if let Some(measurement) = measurement {
            self.measurement = measurement;
        }
        if let Some(goal_amount) = goal_amount {
            self.goal_amount = goal_amount;
        }
        if let Some(increment_amount) = increment_amount {
            self.increment_amount = increment_amount;
        }
        if let Some(is_active) = is_active {
            self.is_active = is_active;
        }
        self.updated_at = Some(now);
    }

    pub fn is_daily(&self) -> bool {
        self.goal_type == GoalType::Daily
    }

    pub fn is_cumulative(&self) -> bool {
        self.goal_type == GoalType::Cumulative
    }

    /// Checkboxes needed to meet the goal: 1 for daily habits,
    /// `ceil(goal_amount / increment_amount)` for cumulative ones.
    pub fn total_checkboxes(&self) -> u32 {
        match self.goal_type {
            GoalType::Daily => 1,
            GoalType::Cumulative => {
                if !(self.increment_amount > 0.0 && self.goal_amount > 0.0) {
                    return 0;
                }
                whole_to_u32((self.goal_amount / self.increment_amount).ceil())
            }
        }
    }

    /// Percentage of checkboxes completed, 0 when there are no checkboxes.
    pub fn progress_percent(&self, completed_checkboxes: u32) -> f64 {
        let total = self.total_checkboxes();
        if total == 0 {
            return 0.0;
        }
        f64::from(completed_checkboxes) / f64::from(total) * 100.0
    }

    pub fn goal_display_text(&self) -> String {
        match self.goal_type {
            GoalType::Daily => self.name.clone(),
            GoalType::Cumulative => format!(
                "{} - Goal: {} {} in {} {} increments.",
                self.name, self.goal_amount, self.measurement, self.increment_amount, self.measurement
            ),
        }
    }

    /// Id for the next definition: catalog size plus one.
    pub fn next_id(catalog: &[Self]) -> String {
        let count = u32::try_from(catalog.len()).unwrap_or(u32::MAX);
        format_id(HABIT_DEFINITION_ID_PREFIX, count.saturating_add(1))
    }

    /// Daily habits first, then alphabetical by name within each type.
    pub fn sort_for_display(definitions: &mut [Self]) {
        definitions.sort_by(|a, b| {
            a.goal_type
                .cmp(&b.goal_type)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    pub fn find<'a>(catalog: &'a [Self], id: &str) -> Option<&'a Self> {
        catalog.iter().find(|d| d.id == id)
    }

    pub fn load_all<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Vec<Self>, AppError> {
        load_records(store, key)
    }

    pub fn save_all<S: KeyValueStore + ?Sized>(store: &S, key: &str, catalog: &[Self]) -> Result<(), AppError> {
        save_records(store, key, catalog)
    }
}
