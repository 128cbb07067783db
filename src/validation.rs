use crate::constants::{GOAL_ID_PREFIX, MAX_HABIT_NAME_LEN};
use crate::error::AppError;
use crate::models::{GoalType, HabitDraft};
use serde::Serialize;

/// Outcome of validating form input. Every failed rule contributes one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate a habit definition draft for both goal types.
pub fn validate_habit_definition(draft: &HabitDraft) -> ValidationReport {
    let mut errors = Vec::new();

    let name = draft.name.trim();
    if name.is_empty() {
        errors.push("Habit name is required".to_string());
    } else if name.chars().count() > MAX_HABIT_NAME_LEN {
        errors.push(format!("Habit name must be {MAX_HABIT_NAME_LEN} characters or less"));
    }

    let goal_type = draft.goal_type.trim();
    if goal_type.is_empty() {
        errors.push("Habit goal type is required".to_string());
    }

    match goal_type.parse::<GoalType>() {
        Ok(GoalType::Cumulative) => {
            errors.extend(validate_cumulative_habit_definition(draft).errors);
        }
        Ok(GoalType::Daily) => {}
        Err(_) => errors.push(r#"Invalid goal type. Must be "daily" or "cumulative""#.to_string()),
    }

    ValidationReport::from_errors(errors)
}

/// Validate the fields only cumulative habits carry. Rules are independent.
pub fn validate_cumulative_habit_definition(draft: &HabitDraft) -> ValidationReport {
    let mut errors = Vec::new();

    if draft.measurement.trim().is_empty() {
        errors.push("Measurement unit is required (miles, hours, pages, etc.)".to_string());
    }
    if draft.goal_amount.is_nan() || draft.goal_amount <= 0.0 {
        errors.push("Goal amount must be greater than 0".to_string());
    }
    if draft.increment_amount.is_nan() || draft.increment_amount <= 0.0 {
        errors.push("Increment amount must be greater than 0".to_string());
    }
    if draft.increment_amount > draft.goal_amount {
        errors.push("Increment amount cannot be larger than goal amount".to_string());
    }

    ValidationReport::from_errors(errors)
}

fn matches_digit_pattern(value: &str, len: usize, dashes: &[usize]) -> bool {
    value.len() == len
        && value.bytes().enumerate().all(|(i, b)| {
            if dashes.contains(&i) {
                b == b'-'
            } else {
                b.is_ascii_digit()
            }
        })
}

/// Validate date format (YYYY-MM-DD).
pub fn validate_date_format(date: &str) -> Result<(), AppError> {
    if !matches_digit_pattern(date, 10, &[4, 7]) {
        return Err(AppError::InvalidInput {
            field: "date",
            reason: "must be in YYYY-MM-DD format".into(),
        });
    }
    Ok(())
}

/// Validate month format (YYYY-MM).
pub fn validate_year_month_format(year_month: &str) -> Result<(), AppError> {
    if !matches_digit_pattern(year_month, 7, &[4]) {
        return Err(AppError::InvalidInput {
            field: "year_month",
            reason: "must be in YYYY-MM format".into(),
        });
    }
    Ok(())
}

/// Validate that an id refers to a monthly goal enrollment.
pub fn validate_goal_id(goal_id: &str) -> Result<(), AppError> {
    let is_goal = goal_id
        .strip_prefix(GOAL_ID_PREFIX)
        .is_some_and(|rest| rest.starts_with('-'));
    if !is_goal {
        return Err(AppError::InvalidInput {
            field: "goal_id",
            reason: format!("must start with '{GOAL_ID_PREFIX}-', got '{goal_id}'"),
        });
    }
    Ok(())
}
