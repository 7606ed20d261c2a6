//! Routine planner settings.
//!
//! # Responsibility
//! - Hold the tunables of the routine model (calendar baseline, default grid
//!   size, editor step, duration cap).
//! - Load them from JSON with per-field defaults.
//!
//! # Invariants
//! - `period_anchor` is a Monday and not after `period_limit`.
//! - `1 <= max_weeks <= 12`, `1 <= minute_step <= 30`.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hard upper bound for a routine length in weeks.
pub const MAX_ROUTINE_WEEKS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutineSettings {
    /// First Monday offered in the start-date picklist.
    pub period_anchor: NaiveDate,
    /// Last day a candidate period may start on.
    pub period_limit: NaiveDate,
    /// Minute increment used by the hour editor controls.
    pub minute_step: u8,
    /// Longest selectable routine, in weeks.
    pub max_weeks: u32,
    /// Presentational delay of week switches, in milliseconds.
    pub week_transition_ms: u64,
}

impl Default for RoutineSettings {
    fn default() -> Self {
        Self {
            period_anchor: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN),
            period_limit: NaiveDate::from_ymd_opt(2027, 12, 31).unwrap_or(NaiveDate::MAX),
            minute_step: 5,
            max_weeks: MAX_ROUTINE_WEEKS,
            week_transition_ms: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// JSON could not be decoded.
    Parse(String),
    /// Decoded value violates a settings invariant.
    Invalid(&'static str),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid settings json: {message}"),
            Self::Invalid(details) => write!(f, "invalid settings: {details}"),
        }
    }
}

impl Error for SettingsError {}

impl RoutineSettings {
    /// Parses settings JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_json::from_str(json).map_err(|err| SettingsError::Parse(err.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.period_anchor.weekday() != Weekday::Mon {
            return Err(SettingsError::Invalid("period_anchor must be a Monday"));
        }
        if self.period_anchor > self.period_limit {
            return Err(SettingsError::Invalid(
                "period_anchor must not be after period_limit",
            ));
        }
        if self.max_weeks == 0 || self.max_weeks > MAX_ROUTINE_WEEKS {
            return Err(SettingsError::Invalid("max_weeks must be within 1..=12"));
        }
        if self.minute_step == 0 || self.minute_step > 30 {
            return Err(SettingsError::Invalid("minute_step must be within 1..=30"));
        }
        Ok(())
    }
}
