//! Week table construction and row maintenance.
//!
//! # Invariants
//! - Week `w` starts `7 * w` days after the routine start.
//! - A routine of `n` weeks gives every new table `n` unset rows.
//! - Row deletion never removes the last remaining row.

use crate::model::routine::{empty_row, HourLabel, WeeklyTable, DAYS_PER_WEEK};
use crate::routine::{RoutineError, RoutineResult};
use crate::settings::RoutineSettings;
use chrono::{Days, NaiveDate};
use log::debug;

/// Builds `weeks` empty week tables starting at `start`.
///
/// # Errors
/// - `InvalidDuration` when `weeks` is 0 or above `settings.max_weeks`.
pub fn build_weeks(
    start: NaiveDate,
    weeks: u32,
    settings: &RoutineSettings,
) -> RoutineResult<Vec<WeeklyTable>> {
    if weeks == 0 || weeks > settings.max_weeks {
        return Err(RoutineError::InvalidDuration {
            weeks,
            max: settings.max_weeks,
        });
    }

    let rows = weeks as usize;
    let mut tables = Vec::with_capacity(rows);
    for week_index in 0..weeks as usize {
        let offset = Days::new((week_index * DAYS_PER_WEEK) as u64);
        let week_start = start
            .checked_add_days(offset)
            .ok_or(RoutineError::InvalidDuration {
                weeks,
                max: settings.max_weeks,
            })?;
        tables.push(WeeklyTable::new(week_index, week_start, rows));
    }

    debug!(
        "event=routine_build module=routine status=ok weeks={} rows={}",
        weeks, rows
    );
    Ok(tables)
}

impl WeeklyTable {
    /// Appends one unset row with empty cells.
    pub fn append_row(&mut self) {
        self.hour_labels.push(HourLabel::Unset);
        self.cells.push(empty_row());
    }

    /// Removes row `index`.
    ///
    /// Returns `false` (and changes nothing) when this is the only row or the
    /// index does not exist.
    pub fn delete_row(&mut self, index: usize) -> bool {
        if self.hour_labels.len() <= 1 || index >= self.hour_labels.len() {
            return false;
        }
        self.hour_labels.remove(index);
        if index < self.cells.len() {
            self.cells.remove(index);
        }
        true
    }
}
