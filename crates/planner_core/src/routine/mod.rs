//! Weekly routine table operations.
//!
//! # Responsibility
//! - Build week grids for a chosen start date and duration.
//! - Edit rows, hour labels and cell content while keeping grid invariants.
//! - Derive which tasks are shown in which cell.
//!
//! # Invariants
//! - No operation leaves a table with zero rows or ragged cell rows.
//! - Failed operations leave the table unchanged.

use crate::model::clock::format_clock;
use chrono::NaiveTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod binder;
pub mod builder;
pub mod cells;
pub mod hour_slot;

/// Neighbour that rejected a candidate hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourBound {
    /// Candidate must be later than the previous row's time.
    After(NaiveTime),
    /// Candidate must be earlier than the next row's time.
    Before(NaiveTime),
}

/// Ordering violation raised when saving an hour label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourOrderError {
    pub row: usize,
    pub candidate: NaiveTime,
    pub bound: HourBound,
}

impl Display for HourOrderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.bound {
            HourBound::After(previous) => write!(
                f,
                "time {} must be later than the previous row ({})",
                format_clock(self.candidate),
                format_clock(previous)
            ),
            HourBound::Before(next) => write!(
                f,
                "time {} must be earlier than the next row ({})",
                format_clock(self.candidate),
                format_clock(next)
            ),
        }
    }
}

impl Error for HourOrderError {}

pub type RoutineResult<T> = Result<T, RoutineError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineError {
    /// Requested duration is outside `1..=max`.
    InvalidDuration { weeks: u32, max: u32 },
    /// No week grid exists yet (start date or duration missing).
    NoActiveWeeks,
    WeekOutOfRange { index: usize, weeks: usize },
    RowOutOfRange { row: usize, rows: usize },
    ColumnOutOfRange(usize),
    /// Hour action issued while the editor is closed.
    NoHourEdit,
    HourOrder(HourOrderError),
}

impl Display for RoutineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDuration { weeks, max } => {
                write!(f, "routine duration must be 1..={max} weeks, got {weeks}")
            }
            Self::NoActiveWeeks => write!(f, "no routine weeks are being edited"),
            Self::WeekOutOfRange { index, weeks } => {
                write!(f, "week {index} out of range for {weeks} weeks")
            }
            Self::RowOutOfRange { row, rows } => {
                write!(f, "row {row} out of range for {rows} rows")
            }
            Self::ColumnOutOfRange(column) => write!(f, "day column {column} out of range"),
            Self::NoHourEdit => write!(f, "no hour edit in progress"),
            Self::HourOrder(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RoutineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::HourOrder(err) => Some(err),
            _ => None,
        }
    }
}

impl From<HourOrderError> for RoutineError {
    fn from(value: HourOrderError) -> Self {
        Self::HourOrder(value)
    }
}
