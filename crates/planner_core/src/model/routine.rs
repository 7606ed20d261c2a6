//! Weekly routine domain model.
//!
//! # Responsibility
//! - Define the week grid (`WeeklyTable`) and its persisted owner
//!   (`SavedRoutine`).
//! - Own the hour label representation including the unset sentinel.
//!
//! # Invariants
//! - `cells.len() == hour_labels.len()` and every row has `DAYS_PER_WEEK`
//!   entries.
//! - A table always keeps at least one row.
//! - `full_start_date` is the only field used for date arithmetic; the
//!   `start_date`/`end_date` strings are display-only.

use crate::model::clock::{format_clock, minutes_since_midnight, parse_clock};
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Columns per week grid (Monday through Sunday).
pub const DAYS_PER_WEEK: usize = 7;

/// Stored text of a row without an assigned time.
pub const UNSET_HOUR_LABEL: &str = "--:--";

/// Stable identifier of a saved routine.
pub type RoutineId = Uuid;

/// Time label for one grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourLabel {
    /// Row has no time yet (`--:--`).
    #[default]
    Unset,
    /// Row is anchored at this time of day.
    At(NaiveTime),
}

impl HourLabel {
    /// Parses `HH:MM` or the unset sentinel.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed == UNSET_HOUR_LABEL {
            return Some(Self::Unset);
        }
        parse_clock(trimmed).map(Self::At)
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Self::Unset => None,
            Self::At(time) => Some(*time),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Minutes since midnight, or `None` for unset rows.
    pub fn minutes(&self) -> Option<u32> {
        self.time().map(minutes_since_midnight)
    }
}

impl Display for HourLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => f.write_str(UNSET_HOUR_LABEL),
            Self::At(time) => f.write_str(&format_clock(*time)),
        }
    }
}

impl Serialize for HourLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HourLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid hour label `{raw}`")))
    }
}

/// One 7-day grid of time-slot rows by day columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTable {
    /// 0-based position within the owning routine.
    pub week_index: usize,
    /// Display-only `day/month` of the first day.
    pub start_date: String,
    /// Display-only `day/month` of the last day.
    pub end_date: String,
    /// Canonical first day of the week.
    pub full_start_date: NaiveDate,
    pub(crate) hour_labels: Vec<HourLabel>,
    pub(crate) cells: Vec<Vec<String>>,
}

impl WeeklyTable {
    /// Creates an empty table with `rows` unset rows (at least one).
    pub fn new(week_index: usize, full_start_date: NaiveDate, rows: usize) -> Self {
        let rows = rows.max(1);
        let end = full_start_date
            .checked_add_days(Days::new(DAYS_PER_WEEK as u64 - 1))
            .unwrap_or(full_start_date);
        Self {
            week_index,
            start_date: day_month(full_start_date),
            end_date: day_month(end),
            full_start_date,
            hour_labels: vec![HourLabel::Unset; rows],
            cells: vec![empty_row(); rows],
        }
    }

    pub fn hour_labels(&self) -> &[HourLabel] {
        &self.hour_labels
    }

    pub fn cells(&self) -> &[Vec<String>] {
        &self.cells
    }

    pub fn row_count(&self) -> usize {
        self.hour_labels.len()
    }

    /// Canonical last day of the week.
    pub fn full_end_date(&self) -> NaiveDate {
        self.day(DAYS_PER_WEEK - 1).unwrap_or(self.full_start_date)
    }

    /// Calendar date of column `column` (0 = Monday slot).
    pub fn day(&self, column: usize) -> Option<NaiveDate> {
        if column >= DAYS_PER_WEEK {
            return None;
        }
        self.full_start_date
            .checked_add_days(Days::new(column as u64))
    }

    /// Whether the grid shape invariant holds.
    pub fn is_well_formed(&self) -> bool {
        !self.hour_labels.is_empty()
            && self.cells.len() == self.hour_labels.len()
            && self.cells.iter().all(|row| row.len() == DAYS_PER_WEEK)
    }
}

/// Named, persisted collection of week tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRoutine {
    pub id: RoutineId,
    pub name: String,
    /// Human label such as `2 weeks`.
    pub duration_label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub weeks: Vec<WeeklyTable>,
}

/// Human label for a routine length.
pub fn duration_label(weeks: usize) -> String {
    if weeks == 1 {
        "1 week".to_string()
    } else {
        format!("{weeks} weeks")
    }
}

/// Unpadded `day/month` display form.
pub fn day_month(date: NaiveDate) -> String {
    format!("{}/{}", date.day(), date.month())
}

pub(crate) fn empty_row() -> Vec<String> {
    vec![String::new(); DAYS_PER_WEEK]
}
