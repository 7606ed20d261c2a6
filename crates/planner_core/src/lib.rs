//! Core domain logic for the weekly routine planner.
//! This crate is the single source of truth for routine table invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod period;
pub mod repo;
pub mod routine;
pub mod sanitize;
pub mod service;
pub mod settings;
pub mod store;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::rich_text::{RichText, TextRun, TextStyle};
pub use model::routine::{HourLabel, RoutineId, SavedRoutine, WeeklyTable};
pub use model::study::{StudyCategory, StudyEntry, StudyItem};
pub use model::task::{Task, TaskId, Timeframe};
pub use period::{periods, Period, Periods};
pub use repo::kv_store::{RepoError, RepoResult};
pub use repo::routine_repo::{RoutineRepository, SqliteRoutineRepository};
pub use repo::study_repo::{SqliteStudyRepository, StudyRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use routine::binder::{bind_week, row_for_time, tasks_for_cell};
pub use routine::builder::build_weeks;
pub use routine::cells::CellCommit;
pub use routine::hour_slot::{HourDraft, HourEditor};
pub use routine::{HourBound, HourOrderError, RoutineError, RoutineResult};
pub use sanitize::{MarkupSanitizer, RichTextSanitizer};
pub use service::routine_service::{RoutineService, RoutineServiceError};
pub use settings::{RoutineSettings, SettingsError};
pub use store::{Applied, RoutineAction, RoutineState, RoutineStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
