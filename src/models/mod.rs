pub mod habit_definition;
pub mod monthly_goal;
pub mod progress_entry;

pub use habit_definition::{GoalType, HabitDefinition, HabitDefinitionPatch, HabitDraft, NewHabitDefinition};
pub use monthly_goal::{EnrichedGoal, MonthlyGoal};
pub use progress_entry::{NewProgressEntry, ProgressEntry};

use crate::constants::ID_DIGITS;

/// Format a sequential id such as `progress-0012`.
pub fn format_id(prefix: &str, number: u32) -> String {
    format!("{prefix}-{number:0width$}", width = ID_DIGITS)
}

/// Numeric suffix of a sequential id, if it has one.
pub fn id_suffix(id: &str) -> Option<u32> {
    id.rsplit_once('-').and_then(|(_, n)| n.parse().ok())
}

/// Next id after the last record of a list: its suffix plus one, or 1 for an
/// empty list. A last id without a numeric suffix falls back to `count + 1`.
pub fn next_sequential_id(prefix: &str, last_id: Option<&str>, count: usize) -> String {
    let next = match last_id {
        None => 1,
        Some(id) => id_suffix(id).map_or_else(
            || u32::try_from(count).unwrap_or(u32::MAX).saturating_add(1),
            |n| n.saturating_add(1),
        ),
    };
    format_id(prefix, next)
}
