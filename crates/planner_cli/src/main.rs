//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `planner_core` linkage.
//! - Print candidate start periods for a routine length.
//!
//! Usage: `planner_cli [weeks]` (defaults to 1).

use planner_core::{build_weeks, RoutineSettings};
use std::process::ExitCode;

const PREVIEW_PERIODS: usize = 5;

fn main() -> ExitCode {
    println!("planner_core version={}", planner_core::core_version());

    let weeks = match std::env::args().nth(1) {
        Some(raw) => match raw.parse::<u32>() {
            Ok(weeks) => weeks,
            Err(_) => {
                eprintln!("weeks must be a positive integer, got `{raw}`");
                return ExitCode::FAILURE;
            }
        },
        None => 1,
    };

    let settings = RoutineSettings::default();
    let mut candidates = settings.start_periods(weeks);
    let Some(first) = candidates.next() else {
        eprintln!("no periods available for weeks={weeks}");
        return ExitCode::FAILURE;
    };

    println!("weeks={} first_period={}..{}", weeks, first.start, first.end);
    for period in candidates.take(PREVIEW_PERIODS - 1) {
        println!("period={}..{}", period.start, period.end);
    }

    match build_weeks(first.start, weeks, &settings) {
        Ok(tables) => {
            for table in &tables {
                println!(
                    "week={} range={}-{} rows={}",
                    table.week_index,
                    table.start_date,
                    table.end_date,
                    table.row_count()
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
