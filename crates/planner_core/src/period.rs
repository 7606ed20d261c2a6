//! Candidate start periods for the routine start-date picklist.
//!
//! # Invariants
//! - Periods are consecutive: each start is the day after the previous end.
//! - Every period spans exactly `weeks * 7` days.
//! - A period is yielded only while its start is on or before the limit.

use crate::model::routine::DAYS_PER_WEEK;
use crate::settings::RoutineSettings;
use chrono::{Days, NaiveDate};

/// One contiguous block of whole weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    pub start: NaiveDate,
    /// Inclusive last day.
    pub end: NaiveDate,
}

/// Lazy, finite iterator over periods. Clone it to restart from the anchor.
#[derive(Debug, Clone)]
pub struct Periods {
    next_start: Option<NaiveDate>,
    limit: NaiveDate,
    span_days: u64,
}

/// Periods of `weeks` weeks from `anchor` until `limit`.
///
/// Empty when `anchor > limit` or `weeks == 0`.
pub fn periods(anchor: NaiveDate, limit: NaiveDate, weeks: u32) -> Periods {
    let span_days = u64::from(weeks) * DAYS_PER_WEEK as u64;
    Periods {
        next_start: (span_days > 0).then_some(anchor),
        limit,
        span_days,
    }
}

impl RoutineSettings {
    /// Start-date options for a routine of `weeks` weeks.
    pub fn start_periods(&self, weeks: u32) -> Periods {
        periods(self.period_anchor, self.period_limit, weeks)
    }
}

impl Iterator for Periods {
    type Item = Period;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start.filter(|start| *start <= self.limit)?;
        let end = start.checked_add_days(Days::new(self.span_days - 1))?;
        self.next_start = end.succ_opt();
        Some(Period { start, end })
    }
}
