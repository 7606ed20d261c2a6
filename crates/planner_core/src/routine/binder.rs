//! Task placement inside a week grid.
//!
//! # Responsibility
//! - Decide which row and day column displays each task.
//!
//! # Invariants
//! - Pure: output depends only on the table, the tasks and `today`.
//! - A task without a time always lands in row 0.
//! - A timed task lands on the set-label row with the smallest absolute
//!   minute distance; ties go to the earliest row; no set labels means row 0.

use crate::model::clock::minutes_since_midnight;
use crate::model::routine::{HourLabel, WeeklyTable, DAYS_PER_WEEK};
use crate::model::task::Task;
use chrono::{NaiveDate, NaiveTime};

/// Row a task of the given time belongs to under `labels`.
pub fn row_for_time(labels: &[HourLabel], time: Option<NaiveTime>) -> usize {
    let Some(time) = time else {
        return 0;
    };
    let target = i64::from(minutes_since_midnight(time));

    let mut best: Option<(usize, i64)> = None;
    for (row, label) in labels.iter().enumerate() {
        let Some(minutes) = label.minutes() else {
            continue;
        };
        let distance = (i64::from(minutes) - target).abs();
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((row, distance)),
        }
    }
    best.map_or(0, |(row, _)| row)
}

/// Tasks shown in cell (`row`, `column`) of `table`.
pub fn tasks_for_cell<'a>(
    table: &WeeklyTable,
    row: usize,
    column: usize,
    tasks: &'a [Task],
    today: NaiveDate,
) -> Vec<&'a Task> {
    let Some(date) = table.day(column) else {
        return Vec::new();
    };
    tasks
        .iter()
        .filter(|task| task.falls_on(date, today))
        .filter(|task| row_for_time(table.hour_labels(), task.time) == row)
        .collect()
}

/// Places every task of the week at once: `grid[row][column]`.
pub fn bind_week<'a>(
    table: &WeeklyTable,
    tasks: &'a [Task],
    today: NaiveDate,
) -> Vec<Vec<Vec<&'a Task>>> {
    let mut grid: Vec<Vec<Vec<&'a Task>>> = (0..table.row_count())
        .map(|_| vec![Vec::new(); DAYS_PER_WEEK])
        .collect();

    for column in 0..DAYS_PER_WEEK {
        let Some(date) = table.day(column) else {
            continue;
        };
        for task in tasks.iter().filter(|task| task.falls_on(date, today)) {
            let row = row_for_time(table.hour_labels(), task.time);
            if let Some(cell) = grid.get_mut(row).and_then(|cells| cells.get_mut(column)) {
                cell.push(task);
            }
        }
    }
    grid
}
