//! Hour label editor.
//!
//! # Responsibility
//! - Track one edit session over a single row's time label.
//! - Validate a candidate time against the immediately adjacent rows.
//!
//! # Invariants
//! - Candidate hours stay in `0..24` and minutes in `0..60`.
//! - Only set neighbour labels constrain a candidate; unset rows are ignored
//!   rather than treated as 00:00 or 24:00.
//! - A rejected save keeps the session open with its candidate unchanged.

use crate::model::routine::{HourLabel, WeeklyTable};
use crate::routine::{HourBound, HourOrderError, RoutineError, RoutineResult};
use chrono::{NaiveTime, Timelike};

const DEFAULT_HOURS: u8 = 8;
const DEFAULT_MINUTES: u8 = 0;

/// Candidate values of an open edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourDraft {
    row: usize,
    hours: u8,
    minutes: u8,
}

impl HourDraft {
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn candidate(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hours), u32::from(self.minutes), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

/// Edit session state machine: `Closed -> Editing -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HourEditor {
    #[default]
    Closed,
    Editing(HourDraft),
}

impl HourEditor {
    /// Opens a session for `row`, seeded from its label or 08:00.
    pub fn open(table: &WeeklyTable, row: usize) -> RoutineResult<Self> {
        let label = table
            .hour_labels()
            .get(row)
            .ok_or(RoutineError::RowOutOfRange {
                row,
                rows: table.row_count(),
            })?;
        let (hours, minutes) = match label.time() {
            Some(time) => (time.hour() as u8, time.minute() as u8),
            None => (DEFAULT_HOURS, DEFAULT_MINUTES),
        };
        Ok(Self::Editing(HourDraft {
            row,
            hours,
            minutes,
        }))
    }

    pub fn draft(&self) -> Option<&HourDraft> {
        match self {
            Self::Closed => None,
            Self::Editing(draft) => Some(draft),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// Moves hours by `delta`, wrapping modulo 24.
    pub fn adjust_hours(&mut self, delta: i32) -> RoutineResult<()> {
        let draft = self.draft_mut()?;
        draft.hours = wrap(i64::from(draft.hours) + i64::from(delta), 24);
        Ok(())
    }

    /// Moves minutes by `steps * step`, wrapping modulo 60.
    pub fn adjust_minutes(&mut self, steps: i32, step: u8) -> RoutineResult<()> {
        let draft = self.draft_mut()?;
        draft.minutes = wrap(
            i64::from(draft.minutes) + i64::from(steps) * i64::from(step),
            60,
        );
        Ok(())
    }

    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }

    /// Validates the candidate and writes it into `table`.
    ///
    /// # Errors
    /// - `NoHourEdit` when closed.
    /// - `RowOutOfRange` when the edited row no longer exists.
    /// - `HourOrder` when a set neighbour is not strictly before/after.
    ///
    /// The session stays open on every error.
    pub fn save(&mut self, table: &mut WeeklyTable) -> RoutineResult<NaiveTime> {
        let draft = *self.draft().ok_or(RoutineError::NoHourEdit)?;
        if draft.row >= table.row_count() {
            return Err(RoutineError::RowOutOfRange {
                row: draft.row,
                rows: table.row_count(),
            });
        }

        let candidate = draft.candidate();
        check_neighbours(table.hour_labels(), draft.row, candidate)?;
        table.hour_labels[draft.row] = HourLabel::At(candidate);
        *self = Self::Closed;
        Ok(candidate)
    }

    fn draft_mut(&mut self) -> RoutineResult<&mut HourDraft> {
        match self {
            Self::Closed => Err(RoutineError::NoHourEdit),
            Self::Editing(draft) => Ok(draft),
        }
    }
}

/// Checks `candidate` for `row` against the adjacent set labels only.
pub fn check_neighbours(
    labels: &[HourLabel],
    row: usize,
    candidate: NaiveTime,
) -> Result<(), HourOrderError> {
    let previous = row
        .checked_sub(1)
        .and_then(|index| labels.get(index))
        .and_then(HourLabel::time);
    if let Some(previous) = previous {
        if candidate <= previous {
            return Err(HourOrderError {
                row,
                candidate,
                bound: HourBound::After(previous),
            });
        }
    }

    let next = labels.get(row + 1).and_then(HourLabel::time);
    if let Some(next) = next {
        if candidate >= next {
            return Err(HourOrderError {
                row,
                candidate,
                bound: HourBound::Before(next),
            });
        }
    }
    Ok(())
}

fn wrap(value: i64, modulus: i64) -> u8 {
    value.rem_euclid(modulus) as u8
}
