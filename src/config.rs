use crate::constants::{DEFAULT_CATALOG_KEY, DEFAULT_GOALS_PREFIX, DEFAULT_PROGRESS_PREFIX};

/// Storage keys, matching the browser dashboard's local-storage layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub catalog: String,
    pub goals_prefix: String,
    pub progress_prefix: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            catalog: DEFAULT_CATALOG_KEY.to_string(),
            goals_prefix: DEFAULT_GOALS_PREFIX.to_string(),
            progress_prefix: DEFAULT_PROGRESS_PREFIX.to_string(),
        }
    }
}

impl StorageKeys {
    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    /// `{goals}-{year}`: every enrollment of one year.
    pub fn goals(&self, year: i32) -> String {
        format!("{}-{year}", self.goals_prefix)
    }

    /// `{progress}-{YYYY-MM}`: every progress entry of one month.
    pub fn progress(&self, year_month: &str) -> String {
        format!("{}-{year_month}", self.progress_prefix)
    }
}

/// Which month's ledger an in-place progress update writes to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LedgerScope {
    /// The month of the date being acted on (selected date, else today).
    #[default]
    TargetMonth,
    /// The app's current calendar month, whatever date is being acted on.
    AppMonth,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerConfig {
    pub keys: StorageKeys,
    pub ledger_scope: LedgerScope,
}
