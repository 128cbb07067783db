//! Progress rollups: per-goal monthly totals, percentage bands, and the
//! composed tracker view.

use crate::constants::{FALLBACK_GOAL_TOTAL, FALLBACK_INCREMENT_AMOUNT};
use crate::dates::DateInfo;
use crate::models::{EnrichedGoal, GoalType, HabitDefinition, ProgressEntry};
use serde::Serialize;

/// Visual band for a progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressBand {
    #[serde(rename = "progress-exceeded")]
    Exceeded,
    #[serde(rename = "progress-full")]
    Full,
    #[serde(rename = "progress-high")]
    High,
    #[serde(rename = "progress-medium")]
    Medium,
    #[serde(rename = "progress-low-medium")]
    LowMedium,
    #[serde(rename = "progress-low")]
    Low,
}

impl ProgressBand {
    /// Band for any percentage. NaN falls through to `Low`.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 100.0 {
            ProgressBand::Exceeded
        } else if percentage >= 90.0 {
            ProgressBand::Full
        } else if percentage >= 70.0 {
            ProgressBand::High
        } else if percentage >= 50.0 {
            ProgressBand::Medium
        } else if percentage >= 30.0 {
            ProgressBand::LowMedium
        } else {
            ProgressBand::Low
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            ProgressBand::Exceeded => "progress-exceeded",
            ProgressBand::Full => "progress-full",
            ProgressBand::High => "progress-high",
            ProgressBand::Medium => "progress-medium",
            ProgressBand::LowMedium => "progress-low-medium",
            ProgressBand::Low => "progress-low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProgress {
    pub habit_name: String,
    pub goal_type: GoalType,
    /// Entry count for daily habits, raw increment sum for cumulative ones
    pub completed_progress: u32,
    /// Elapsed days for daily habits, the configured goal amount for cumulative ones
    pub goal_total: f64,
}

/// Month-to-date progress of one goal over that month's ledger.
pub fn monthly_progress(
    definition: &HabitDefinition,
    goal_id: &str,
    month_entries: &[ProgressEntry],
    elapsed_days: u32,
) -> MonthlyProgress {
    let (completed_progress, goal_total) = match definition.goal_type {
        GoalType::Daily => {
            let count = month_entries
                .iter()
                .filter(|e| e.habit_month_goal_id == goal_id)
                .count();
            (u32::try_from(count).unwrap_or(u32::MAX), f64::from(elapsed_days))
        }
        GoalType::Cumulative => (
            ProgressEntry::total_for_goal(month_entries, goal_id),
            definition.goal_amount,
        ),
    };

    MonthlyProgress {
        habit_name: definition.name.clone(),
        goal_type: definition.goal_type,
        completed_progress,
        goal_total,
    }
}

/// `value / total * 100`, or 0 when there is no total to measure against.
pub fn percentage(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total * 100.0
    } else {
        0.0
    }
}

/// Amounts are shown with one decimal, and percentages are taken from the
/// shown amount.
fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TodayState {
    Checkbox {
        checked: bool,
    },
    Amount {
        increments: u32,
        value: f64,
        measurement: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayItem {
    pub goal_id: String,
    pub name: String,
    /// False for dates after today; such days cannot be checked off yet.
    pub editable: bool,
    pub state: TodayState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthItem {
    pub goal_id: String,
    pub name: String,
    pub goal_type: GoalType,
    pub value: f64,
    pub unit: String,
    pub goal_total: f64,
    /// Unclamped, so values past 100 reach the `Exceeded` band
    pub percentage: f64,
    pub rounded_percentage: f64,
    pub band: ProgressBand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerView {
    pub date: DateInfo,
    pub today: Vec<TodayItem>,
    pub month: Vec<MonthItem>,
}

/// Inputs for composing a tracker view; all loaded by the caller.
pub struct ViewInputs<'a> {
    pub date: DateInfo,
    pub editable: bool,
    pub elapsed_days: u32,
    pub tracked: &'a [EnrichedGoal],
    pub month_entries: &'a [ProgressEntry],
}

pub fn compose_view(inputs: ViewInputs<'_>) -> TrackerView {
    let ViewInputs {
        date,
        editable,
        elapsed_days,
        tracked,
        month_entries,
    } = inputs;

    let day_entries: Vec<ProgressEntry> = month_entries
        .iter()
        .filter(|e| e.date == date.date)
        .cloned()
        .collect();

    let mut today = Vec::with_capacity(tracked.len());
    let mut month = Vec::with_capacity(tracked.len());

    for goal in tracked {
        // A goal whose definition is gone renders like a cumulative one
        let goal_type = goal.goal_type.unwrap_or(GoalType::Cumulative);
        let increment_amount = goal.increment_amount.unwrap_or(FALLBACK_INCREMENT_AMOUNT);
        let day_value = ProgressEntry::total_for_goal(&day_entries, &goal.id);
        let month_value = ProgressEntry::total_for_goal(month_entries, &goal.id);

        let state = match goal_type {
            GoalType::Daily => TodayState::Checkbox { checked: day_value > 0 },
            GoalType::Cumulative => TodayState::Amount {
                increments: day_value,
                value: round_tenths(f64::from(day_value) * increment_amount),
                measurement: goal.measurement.clone(),
            },
        };
        today.push(TodayItem {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            editable,
            state,
        });

        let (value, goal_total, unit) = match goal_type {
            GoalType::Daily => (
                f64::from(month_value),
                f64::from(elapsed_days),
                if goal.measurement.is_empty() {
                    "days".to_string()
                } else {
                    goal.measurement.clone()
                },
            ),
            GoalType::Cumulative => (
                round_tenths(f64::from(month_value) * increment_amount),
                goal.goal_amount.unwrap_or(FALLBACK_GOAL_TOTAL),
                goal.measurement.clone(),
            ),
        };
        let pct = percentage(value, goal_total);
        month.push(MonthItem {
            goal_id: goal.id.clone(),
            name: goal.name.clone(),
            goal_type,
            value,
            unit,
            goal_total,
            percentage: pct,
            rounded_percentage: pct.round(),
            band: ProgressBand::from_percentage(pct),
        });
    }

    TrackerView { date, today, month }
}
