//! Calendar helpers shared by the habit tracker.
//!
//! Dates travel through storage as `YYYY-MM-DD` strings and months as
//! `YYYY-MM` strings; this module converts between those and `chrono` values.

use crate::error::AppError;
use crate::validation::{validate_date_format, validate_year_month_format};
use chrono::{Datelike, Months, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use std::cmp::Ordering;

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Decomposed view of a calendar date, as consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInfo {
    pub year: i32,
    /// Zero-based month (January = 0)
    pub month: u32,
    pub month_name: &'static str,
    pub day: u32,
    pub day_ordinal: String,
    /// Zero-based weekday (Sunday = 0)
    pub day_of_week: u32,
    pub day_name: &'static str,
    pub days_in_month: u32,
    pub year_month: String,
    pub date: String,
    #[serde(skip)]
    pub naive: NaiveDate,
}

impl DateInfo {
    pub fn from_date(date: NaiveDate) -> Self {
        let day_of_week = date.weekday().num_days_from_sunday();
        Self {
            year: date.year(),
            month: date.month0(),
            month_name: month_name(date.month0()),
            day: date.day(),
            day_ordinal: format!("{}{}", date.day(), ordinal_suffix(date.day())),
            day_of_week,
            day_name: DAY_NAMES.get(day_of_week_index(day_of_week)).copied().unwrap_or(""),
            days_in_month: last_day_of_month(date),
            year_month: year_month_of(date),
            date: date_string(date),
            naive: date,
        }
    }

    /// Parse a `YYYY-MM-DD` string.
    pub fn parse(date: &str) -> Result<Self, AppError> {
        parse_date(date).map(Self::from_date)
    }
}

fn day_of_week_index(day: u32) -> usize {
    usize::try_from(day).unwrap_or(usize::MAX)
}

fn month_name(month0: u32) -> &'static str {
    MONTH_NAMES
        .get(usize::try_from(month0).unwrap_or(usize::MAX))
        .copied()
        .unwrap_or("")
}

/// Ordinal suffix for a day of the month: 1st, 2nd, 3rd, 11th, 22nd...
pub fn ordinal_suffix(day: u32) -> &'static str {
    if (11..=19).contains(&(day % 100)) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Number of days in the given month (1-based), or None for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(last_day_of_month)
}

fn last_day_of_month(date: NaiveDate) -> u32 {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}

pub fn year_month_of(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn date_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` string, rejecting anything else.
pub fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    validate_date_format(date)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| AppError::InvalidInput {
        field: "date",
        reason: e.to_string(),
    })
}

/// Parse a `YYYY-MM` string into (year, 1-based month).
pub fn parse_year_month(year_month: &str) -> Result<(i32, u32), AppError> {
    validate_year_month_format(year_month)?;
    let err = |reason: &str| AppError::InvalidInput {
        field: "year_month",
        reason: reason.into(),
    };

    let (year, month) = year_month
        .split_once('-')
        .ok_or_else(|| err("must be in YYYY-MM format"))?;
    let year: i32 = year.parse().map_err(|_| err("invalid year"))?;
    let month: u32 = month.parse().map_err(|_| err("invalid month"))?;
    if !(1..=12).contains(&month) {
        return Err(err("month must be 01-12"));
    }
    Ok((year, month))
}

/// Days of `year_month` that count toward a daily habit's goal as of `today`.
///
/// Past months count in full, the current month counts up to and including
/// today, future months count nothing.
pub fn elapsed_days(year_month: &str, today: NaiveDate) -> Result<u32, AppError> {
    let (year, month) = parse_year_month(year_month)?;
    match (year, month).cmp(&(today.year(), today.month())) {
        Ordering::Less => days_in_month(year, month).ok_or_else(|| AppError::InvalidInput {
            field: "year_month",
            reason: format!("no such month: {year_month}"),
        }),
        Ordering::Equal => Ok(today.day()),
        Ordering::Greater => Ok(0),
    }
}

/// Current UTC time as an RFC 3339 string with milliseconds.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
