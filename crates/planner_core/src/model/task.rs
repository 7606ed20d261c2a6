//! Task records consumed by the routine view.
//!
//! # Responsibility
//! - Describe the persisted task shape (time, timeframe, display metadata).
//! - Answer "does this task fall on date X" without touching storage.
//!
//! # Invariants
//! - The routine model never mutates tasks.
//! - `Timeframe::Today` is re-evaluated against the caller-supplied date, so
//!   the same task moves day by day.
//! - `timeframe` and `date` are both optional and matched independently.

use crate::model::clock;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task record.
pub type TaskId = Uuid;

/// Scheduling flag stored next to the optional explicit date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    /// Shown on whatever day is current.
    Today,
    /// Scheduled by the explicit `date` field.
    Date,
    /// Not scheduled on any day.
    Someday,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    /// Optional time of day, stored as `HH:MM`.
    #[serde(default, with = "clock::option", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<Timeframe>,
    /// Explicit calendar date, independent of `timeframe`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Task {
    /// Creates an open, unscheduled task with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            time: None,
            timeframe: None,
            date: None,
            completed: false,
            color: None,
            category: None,
        }
    }

    /// Flags the task as `today`.
    pub fn today(mut self) -> Self {
        self.timeframe = Some(Timeframe::Today);
        self
    }

    /// Pins the task to `date`.
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.timeframe.get_or_insert(Timeframe::Date);
        self.date = Some(date);
        self
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Whether this task is shown on `date`, given the current day `today`.
    ///
    /// The `today` flag and the explicit date are checked independently.
    pub fn falls_on(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let today_match = self.timeframe == Some(Timeframe::Today) && today == date;
        today_match || self.date == Some(date)
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, Timeframe};
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[test]
    fn today_tasks_follow_the_current_day() {
        let task = Task::new("stretch").today();
        assert!(task.falls_on(date(4), date(4)));
        assert!(!task.falls_on(date(5), date(4)));
    }

    #[test]
    fn dated_and_someday_tasks() {
        let dated = Task::new("exam").on(date(10));
        assert_eq!(dated.timeframe, Some(Timeframe::Date));
        assert!(dated.falls_on(date(10), date(1)));
        assert!(!dated.falls_on(date(11), date(11)));

        let someday = Task {
            timeframe: Some(Timeframe::Someday),
            ..Task::new("read more")
        };
        assert!(!someday.falls_on(date(1), date(1)));
    }

    #[test]
    fn today_flag_keeps_its_explicit_date() {
        let task = Task::new("call").today().on(date(7));
        assert_eq!(task.timeframe, Some(Timeframe::Today));
        assert!(task.falls_on(date(7), date(5)));
        assert!(task.falls_on(date(5), date(5)));
        assert!(!task.falls_on(date(6), date(5)));
    }

    #[test]
    fn task_json_shape_is_flat() {
        let json = r##"{
            "id": "6f1d6c1e-3f0c-4d55-9c79-3c4b8f1f2a10",
            "title": "Review notes",
            "time": "09:50",
            "timeframe": "date",
            "date": "2025-03-10",
            "color": "#ff8800"
        }"##;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.timeframe, Some(Timeframe::Date));
        assert_eq!(task.date, Some(date(10)));
        assert_eq!(task.time.map(|t| t.to_string()), Some("09:50:00".to_string()));
        assert!(!task.completed);

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["time"], "09:50");
        assert_eq!(back["timeframe"], "date");
        assert_eq!(back["date"], "2025-03-10");
    }

    #[test]
    fn timeframe_and_date_are_optional() {
        let dated: Task = serde_json::from_str(
            r#"{"id": "6f1d6c1e-3f0c-4d55-9c79-3c4b8f1f2a10", "title": "t", "date": "2025-03-07"}"#,
        )
        .unwrap();
        assert_eq!(dated.timeframe, None);
        assert!(dated.falls_on(date(7), date(1)));

        let bare: Task = serde_json::from_str(
            r#"{"id": "6f1d6c1e-3f0c-4d55-9c79-3c4b8f1f2a11", "title": "t"}"#,
        )
        .unwrap();
        assert_eq!(bare.timeframe, None);
        assert_eq!(bare.date, None);
        assert!(!bare.falls_on(date(7), date(7)));
    }
}
