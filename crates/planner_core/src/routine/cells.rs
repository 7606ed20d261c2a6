//! Cell content commits.
//!
//! # Invariants
//! - Stored cell content is always sanitizer output.
//! - A commit writes only when the sanitized value differs from the stored
//!   one, so re-committing unchanged content is a no-op.

use crate::model::routine::{WeeklyTable, DAYS_PER_WEEK};
use crate::routine::{RoutineError, RoutineResult};
use crate::sanitize::MarkupSanitizer;

/// Outcome of a cell commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellCommit {
    /// Sanitized content equals the stored content; nothing written.
    Unchanged,
    Updated,
}

impl WeeklyTable {
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.cells.get(row)?.get(column).map(String::as_str)
    }

    /// Commits edited markup for one cell (called on focus loss).
    pub fn commit_cell<S>(
        &mut self,
        row: usize,
        column: usize,
        markup: &str,
        sanitizer: &S,
    ) -> RoutineResult<CellCommit>
    where
        S: MarkupSanitizer + ?Sized,
    {
        if column >= DAYS_PER_WEEK {
            return Err(RoutineError::ColumnOutOfRange(column));
        }
        let rows = self.cells.len();
        let slot = self
            .cells
            .get_mut(row)
            .and_then(|cells| cells.get_mut(column))
            .ok_or(RoutineError::RowOutOfRange { row, rows })?;

        let sanitized = sanitizer.sanitize(markup);
        if *slot == sanitized {
            return Ok(CellCommit::Unchanged);
        }
        *slot = sanitized;
        Ok(CellCommit::Updated)
    }

    /// Stored content passed through the sanitizer again for rendering.
    pub fn display_cell<S>(&self, row: usize, column: usize, sanitizer: &S) -> Option<String>
    where
        S: MarkupSanitizer + ?Sized,
    {
        self.cell(row, column).map(|markup| sanitizer.sanitize(markup))
    }
}

#[cfg(test)]
mod tests {
    use super::CellCommit;
    use crate::model::routine::WeeklyTable;
    use crate::routine::RoutineError;
    use crate::sanitize::RichTextSanitizer;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn table() -> WeeklyTable {
        WeeklyTable::new(0, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap(), 2)
    }

    #[test]
    fn commit_stores_sanitized_markup() {
        let mut table = table();
        let outcome = table
            .commit_cell(1, 6, "<b>gym</b><script>x()</script>", &RichTextSanitizer)
            .unwrap();
        assert_eq!(outcome, CellCommit::Updated);
        assert_eq!(table.cell(1, 6), Some("<b>gym</b>"));
        assert_eq!(table.cell(0, 6), Some(""));
    }

    #[test]
    fn recommitting_same_content_is_unchanged() {
        let mut table = table();
        table
            .commit_cell(0, 0, "<strong>read</strong>", &RichTextSanitizer)
            .unwrap();
        let snapshot = table.clone();

        let again = table
            .commit_cell(0, 0, "<b>read</b>", &RichTextSanitizer)
            .unwrap();
        assert_eq!(again, CellCommit::Unchanged);
        assert_eq!(table, snapshot);

        let empty = table.commit_cell(1, 1, "", &RichTextSanitizer).unwrap();
        assert_eq!(empty, CellCommit::Unchanged);
    }

    #[test]
    fn sanitizer_runs_before_commit_and_display() {
        let calls = Cell::new(0);
        let counting = |markup: &str| {
            calls.set(calls.get() + 1);
            markup.trim().to_string()
        };
        let mut table = table();
        table.commit_cell(0, 2, "  plan  ", &counting).unwrap();
        assert_eq!(table.display_cell(0, 2, &counting).as_deref(), Some("plan"));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn out_of_range_cells_are_errors() {
        let mut table = table();
        assert_eq!(
            table.commit_cell(0, 7, "x", &RichTextSanitizer),
            Err(RoutineError::ColumnOutOfRange(7))
        );
        assert_eq!(
            table.commit_cell(2, 0, "x", &RichTextSanitizer),
            Err(RoutineError::RowOutOfRange { row: 2, rows: 2 })
        );
    }
}
