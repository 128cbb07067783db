// src/constants.rs

/// Id prefix for habit definitions (`habitDefinition-0007`)
pub const HABIT_DEFINITION_ID_PREFIX: &str = "habitDefinition";

/// Id prefix for monthly goal enrollments (`goal-0003`)
pub const GOAL_ID_PREFIX: &str = "goal";

/// Id prefix for progress entries (`progress-0012`)
pub const PROGRESS_ID_PREFIX: &str = "progress";

/// Zero-padded width of the numeric id suffix
pub const ID_DIGITS: usize = 4;

/// Maximum habit name length
pub const MAX_HABIT_NAME_LEN: usize = 50;

/// Storage key of the all-time habit catalog
pub const DEFAULT_CATALOG_KEY: &str = "dailyLifeHabitDefinitions";

/// Storage key prefix of the per-year goal enrollments
pub const DEFAULT_GOALS_PREFIX: &str = "dailyLifeHabitMonthGoals";

/// Storage key prefix of the per-month progress ledger
pub const DEFAULT_PROGRESS_PREFIX: &str = "dailyLifeHabitProgress";

/// Increment size assumed when a tracked goal's definition is missing
pub const FALLBACK_INCREMENT_AMOUNT: f64 = 0.5;

/// Monthly goal total assumed when a tracked goal's definition is missing
pub const FALLBACK_GOAL_TOTAL: f64 = 1.0;

/// Chrome limits native messaging to 1MB (1024 * 1024 bytes)
pub const MAX_NATIVE_MESSAGE_SIZE: usize = 1024 * 1024;
