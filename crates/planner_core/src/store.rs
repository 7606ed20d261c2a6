//! Routine editing state container.
//!
//! # Responsibility
//! - Own the full routine editing state in one value.
//! - Apply user intents as reducer-style `RoutineAction`s.
//!
//! # Invariants
//! - Row, hour and cell actions target the current week only.
//! - `revision` increases exactly when an action changed state.
//! - A failed action leaves state untouched, except that an hour ordering
//!   failure records its message in `validation_message`.
//! - `current_week < editing_weeks.len()` whenever weeks exist.

use crate::model::routine::{RoutineId, SavedRoutine, WeeklyTable};
use crate::routine::builder::build_weeks;
use crate::routine::cells::CellCommit;
use crate::routine::hour_slot::HourEditor;
use crate::routine::{RoutineError, RoutineResult};
use crate::sanitize::{MarkupSanitizer, RichTextSanitizer};
use crate::settings::RoutineSettings;
use chrono::NaiveDate;
use log::{debug, warn};

/// Identity of the saved routine currently loaded for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRoutine {
    pub id: RoutineId,
    pub name: String,
    pub created_at: i64,
}

/// Snapshot of everything the routine editor shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutineState {
    pub duration_weeks: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub editing_weeks: Vec<WeeklyTable>,
    pub current_week: usize,
    pub hour_editor: HourEditor,
    /// Last hour ordering failure, cleared by the next hour action.
    pub validation_message: Option<String>,
    pub loaded: Option<LoadedRoutine>,
    pub revision: u64,
}

/// User intents accepted by `RoutineStore::dispatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineAction {
    SelectDuration(u32),
    SelectStartDate(NaiveDate),
    ShowWeek(usize),
    NextWeek,
    PreviousWeek,
    AppendRow,
    DeleteRow(usize),
    BeginHourEdit(usize),
    AdjustHours(i32),
    /// Delta in editor steps (see `RoutineSettings::minute_step`).
    AdjustMinutes(i32),
    SaveHourEdit,
    CancelHourEdit,
    CommitCell {
        row: usize,
        column: usize,
        markup: String,
    },
    LoadRoutine(SavedRoutine),
    Reset,
}

/// Whether an accepted action changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Changed,
    Unchanged,
}

/// Owned routine state plus its reducer.
pub struct RoutineStore<S: MarkupSanitizer = RichTextSanitizer> {
    settings: RoutineSettings,
    sanitizer: S,
    state: RoutineState,
}

impl RoutineStore<RichTextSanitizer> {
    pub fn new(settings: RoutineSettings) -> Self {
        Self::with_sanitizer(settings, RichTextSanitizer)
    }
}

impl<S: MarkupSanitizer> RoutineStore<S> {
    pub fn with_sanitizer(settings: RoutineSettings, sanitizer: S) -> Self {
        Self {
            settings,
            sanitizer,
            state: RoutineState::default(),
        }
    }

    pub fn state(&self) -> &RoutineState {
        &self.state
    }

    pub fn settings(&self) -> &RoutineSettings {
        &self.settings
    }

    pub fn sanitizer(&self) -> &S {
        &self.sanitizer
    }

    pub fn current_table(&self) -> Option<&WeeklyTable> {
        self.state.editing_weeks.get(self.state.current_week)
    }

    /// Applies one action.
    ///
    /// # Errors
    /// Returns the `RoutineError` of the rejected action; state is unchanged
    /// apart from `validation_message` on hour ordering failures.
    pub fn dispatch(&mut self, action: RoutineAction) -> RoutineResult<Applied> {
        let label = action_label(&action);
        let result = self.reduce(action);
        match &result {
            Ok(Applied::Changed) => {
                self.state.revision += 1;
                debug!(
                    "event=routine_action module=store status=ok action={} revision={}",
                    label, self.state.revision
                );
            }
            Ok(Applied::Unchanged) => {
                debug!(
                    "event=routine_action module=store status=noop action={}",
                    label
                );
            }
            Err(err) => {
                warn!(
                    "event=routine_action module=store status=rejected action={} error={}",
                    label, err
                );
            }
        }
        result
    }

    /// Marks `routine` as the loaded routine without touching the grid.
    pub(crate) fn attach(&mut self, routine: &SavedRoutine) {
        self.state.loaded = Some(LoadedRoutine {
            id: routine.id,
            name: routine.name.clone(),
            created_at: routine.created_at,
        });
        self.state.revision += 1;
    }

    fn reduce(&mut self, action: RoutineAction) -> RoutineResult<Applied> {
        match action {
            RoutineAction::SelectDuration(weeks) => {
                if weeks == 0 || weeks > self.settings.max_weeks {
                    return Err(RoutineError::InvalidDuration {
                        weeks,
                        max: self.settings.max_weeks,
                    });
                }
                let rebuilt = self.build_for(self.state.start_date, Some(weeks))?;
                self.state.duration_weeks = Some(weeks);
                self.install(rebuilt);
                Ok(Applied::Changed)
            }
            RoutineAction::SelectStartDate(date) => {
                let rebuilt = self.build_for(Some(date), self.state.duration_weeks)?;
                self.state.start_date = Some(date);
                self.install(rebuilt);
                Ok(Applied::Changed)
            }
            RoutineAction::ShowWeek(index) => self.show_week(index),
            RoutineAction::NextWeek => {
                let next = self.state.current_week + 1;
                if next >= self.state.editing_weeks.len() {
                    return Ok(Applied::Unchanged);
                }
                self.show_week(next)
            }
            RoutineAction::PreviousWeek => match self.state.current_week.checked_sub(1) {
                Some(previous) if !self.state.editing_weeks.is_empty() => {
                    self.show_week(previous)
                }
                _ => Ok(Applied::Unchanged),
            },
            RoutineAction::AppendRow => {
                self.current_table_mut()?.append_row();
                Ok(Applied::Changed)
            }
            RoutineAction::DeleteRow(index) => {
                if self.current_table_mut()?.delete_row(index) {
                    // Row indices shifted; an open draft may now point elsewhere.
                    self.state.hour_editor.cancel();
                    Ok(Applied::Changed)
                } else {
                    Ok(Applied::Unchanged)
                }
            }
            RoutineAction::BeginHourEdit(row) => {
                let editor = HourEditor::open(self.current_table_ref()?, row)?;
                self.state.hour_editor = editor;
                self.state.validation_message = None;
                Ok(Applied::Changed)
            }
            RoutineAction::AdjustHours(delta) => {
                self.state.hour_editor.adjust_hours(delta)?;
                self.state.validation_message = None;
                Ok(Applied::Changed)
            }
            RoutineAction::AdjustMinutes(steps) => {
                let step = self.settings.minute_step;
                self.state.hour_editor.adjust_minutes(steps, step)?;
                self.state.validation_message = None;
                Ok(Applied::Changed)
            }
            RoutineAction::SaveHourEdit => self.save_hour_edit(),
            RoutineAction::CancelHourEdit => {
                if !self.state.hour_editor.is_open() {
                    return Ok(Applied::Unchanged);
                }
                self.state.hour_editor.cancel();
                self.state.validation_message = None;
                Ok(Applied::Changed)
            }
            RoutineAction::CommitCell {
                row,
                column,
                markup,
            } => {
                let index = self.state.current_week;
                let table = self
                    .state
                    .editing_weeks
                    .get_mut(index)
                    .ok_or(RoutineError::NoActiveWeeks)?;
                match table.commit_cell(row, column, &markup, &self.sanitizer)? {
                    CellCommit::Updated => Ok(Applied::Changed),
                    CellCommit::Unchanged => Ok(Applied::Unchanged),
                }
            }
            RoutineAction::LoadRoutine(routine) => {
                if routine.weeks.is_empty() {
                    return Err(RoutineError::NoActiveWeeks);
                }
                let revision = self.state.revision;
                self.state = RoutineState {
                    duration_weeks: Some(routine.weeks.len() as u32),
                    start_date: Some(routine.start_date),
                    loaded: Some(LoadedRoutine {
                        id: routine.id,
                        name: routine.name,
                        created_at: routine.created_at,
                    }),
                    editing_weeks: routine.weeks,
                    revision,
                    ..RoutineState::default()
                };
                Ok(Applied::Changed)
            }
            RoutineAction::Reset => {
                let revision = self.state.revision;
                self.state = RoutineState {
                    revision,
                    ..RoutineState::default()
                };
                Ok(Applied::Changed)
            }
        }
    }

    fn build_for(
        &self,
        start: Option<NaiveDate>,
        weeks: Option<u32>,
    ) -> RoutineResult<Option<Vec<WeeklyTable>>> {
        match (start, weeks) {
            (Some(start), Some(weeks)) => build_weeks(start, weeks, &self.settings).map(Some),
            _ => Ok(None),
        }
    }

    fn install(&mut self, weeks: Option<Vec<WeeklyTable>>) {
        let Some(weeks) = weeks else {
            return;
        };
        self.state.editing_weeks = weeks;
        self.state.current_week = 0;
        self.state.hour_editor = HourEditor::Closed;
        self.state.validation_message = None;
    }

    fn show_week(&mut self, index: usize) -> RoutineResult<Applied> {
        let weeks = self.state.editing_weeks.len();
        if index >= weeks {
            return Err(RoutineError::WeekOutOfRange { index, weeks });
        }
        if index == self.state.current_week {
            return Ok(Applied::Unchanged);
        }
        self.state.current_week = index;
        self.state.hour_editor = HourEditor::Closed;
        self.state.validation_message = None;
        Ok(Applied::Changed)
    }

    fn save_hour_edit(&mut self) -> RoutineResult<Applied> {
        let index = self.state.current_week;
        let table = self
            .state
            .editing_weeks
            .get_mut(index)
            .ok_or(RoutineError::NoActiveWeeks)?;
        match self.state.hour_editor.save(table) {
            Ok(_) => {
                self.state.validation_message = None;
                Ok(Applied::Changed)
            }
            Err(err) => {
                if let RoutineError::HourOrder(order) = &err {
                    self.state.validation_message = Some(order.to_string());
                }
                Err(err)
            }
        }
    }

    fn current_table_ref(&self) -> RoutineResult<&WeeklyTable> {
        self.current_table().ok_or(RoutineError::NoActiveWeeks)
    }

    fn current_table_mut(&mut self) -> RoutineResult<&mut WeeklyTable> {
        let index = self.state.current_week;
        self.state
            .editing_weeks
            .get_mut(index)
            .ok_or(RoutineError::NoActiveWeeks)
    }
}

fn action_label(action: &RoutineAction) -> &'static str {
    match action {
        RoutineAction::SelectDuration(_) => "select_duration",
        RoutineAction::SelectStartDate(_) => "select_start_date",
        RoutineAction::ShowWeek(_) => "show_week",
        RoutineAction::NextWeek => "next_week",
        RoutineAction::PreviousWeek => "previous_week",
        RoutineAction::AppendRow => "append_row",
        RoutineAction::DeleteRow(_) => "delete_row",
        RoutineAction::BeginHourEdit(_) => "begin_hour_edit",
        RoutineAction::AdjustHours(_) => "adjust_hours",
        RoutineAction::AdjustMinutes(_) => "adjust_minutes",
        RoutineAction::SaveHourEdit => "save_hour_edit",
        RoutineAction::CancelHourEdit => "cancel_hour_edit",
        RoutineAction::CommitCell { .. } => "commit_cell",
        RoutineAction::LoadRoutine(_) => "load_routine",
        RoutineAction::Reset => "reset",
    }
}

#[cfg(test)]
mod tests {
    use super::{Applied, RoutineAction, RoutineStore};
    use crate::model::routine::HourLabel;
    use crate::routine::RoutineError;
    use crate::settings::RoutineSettings;
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn two_week_store() -> RoutineStore {
        let mut store = RoutineStore::new(RoutineSettings::default());
        store.dispatch(RoutineAction::SelectDuration(2)).unwrap();
        store
            .dispatch(RoutineAction::SelectStartDate(date(2024, 1, 1)))
            .unwrap();
        store
    }

    #[test]
    fn grid_is_built_once_duration_and_start_are_known() {
        let mut store = RoutineStore::new(RoutineSettings::default());
        store.dispatch(RoutineAction::SelectDuration(2)).unwrap();
        assert!(store.state().editing_weeks.is_empty());

        store
            .dispatch(RoutineAction::SelectStartDate(date(2024, 1, 1)))
            .unwrap();
        let weeks = &store.state().editing_weeks;
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].start_date, "1/1");
        assert_eq!(weeks[0].end_date, "7/1");
        assert_eq!(weeks[1].start_date, "8/1");
        assert_eq!(weeks[1].end_date, "14/1");
        assert_eq!(store.state().current_week, 0);
    }

    #[test]
    fn invalid_duration_leaves_state_untouched() {
        let mut store = two_week_store();
        let before = store.state().clone();

        let err = store.dispatch(RoutineAction::SelectDuration(13)).unwrap_err();
        assert!(matches!(err, RoutineError::InvalidDuration { weeks: 13, .. }));
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn week_navigation_is_bounded() {
        let mut store = two_week_store();
        assert_eq!(
            store.dispatch(RoutineAction::PreviousWeek).unwrap(),
            Applied::Unchanged
        );
        assert_eq!(
            store.dispatch(RoutineAction::NextWeek).unwrap(),
            Applied::Changed
        );
        assert_eq!(store.state().current_week, 1);
        assert_eq!(
            store.dispatch(RoutineAction::NextWeek).unwrap(),
            Applied::Unchanged
        );
        assert!(matches!(
            store.dispatch(RoutineAction::ShowWeek(5)),
            Err(RoutineError::WeekOutOfRange { index: 5, weeks: 2 })
        ));
    }

    #[test]
    fn row_actions_target_current_week_only() {
        let mut store = two_week_store();
        store.dispatch(RoutineAction::NextWeek).unwrap();
        store.dispatch(RoutineAction::AppendRow).unwrap();

        let weeks = &store.state().editing_weeks;
        assert_eq!(weeks[0].row_count(), 2);
        assert_eq!(weeks[1].row_count(), 3);
    }

    #[test]
    fn last_row_is_never_deleted() {
        let mut store = RoutineStore::new(RoutineSettings::default());
        store.dispatch(RoutineAction::SelectDuration(1)).unwrap();
        store
            .dispatch(RoutineAction::SelectStartDate(date(2024, 1, 1)))
            .unwrap();

        let revision = store.state().revision;
        assert_eq!(
            store.dispatch(RoutineAction::DeleteRow(0)).unwrap(),
            Applied::Unchanged
        );
        assert_eq!(store.current_table().unwrap().row_count(), 1);
        assert_eq!(store.state().revision, revision);
    }

    #[test]
    fn hour_edit_round_trip_writes_label() {
        let mut store = two_week_store();
        store.dispatch(RoutineAction::BeginHourEdit(0)).unwrap();
        store.dispatch(RoutineAction::AdjustHours(-1)).unwrap();
        store.dispatch(RoutineAction::AdjustMinutes(3)).unwrap();
        store.dispatch(RoutineAction::SaveHourEdit).unwrap();

        let table = store.current_table().unwrap();
        assert_eq!(table.hour_labels()[0], HourLabel::At(hm(7, 15)));
        assert!(!store.state().hour_editor.is_open());
    }

    #[test]
    fn huge_adjustments_wrap_instead_of_failing() {
        let mut store = two_week_store();
        store.dispatch(RoutineAction::BeginHourEdit(0)).unwrap();
        store
            .dispatch(RoutineAction::AdjustMinutes(i32::MAX / 2))
            .unwrap();
        store.dispatch(RoutineAction::AdjustHours(i32::MIN)).unwrap();

        let draft = *store.state().hour_editor.draft().unwrap();
        assert!(draft.hours() < 24);
        assert!(draft.minutes() < 60);
        store.dispatch(RoutineAction::SaveHourEdit).unwrap();
    }

    #[test]
    fn ordering_failure_keeps_session_and_records_message() {
        let mut store = two_week_store();
        store.dispatch(RoutineAction::BeginHourEdit(0)).unwrap();
        store.dispatch(RoutineAction::AdjustHours(2)).unwrap();
        store.dispatch(RoutineAction::SaveHourEdit).unwrap();

        // Row 1 at 09:00 is not later than row 0 at 10:00.
        store.dispatch(RoutineAction::BeginHourEdit(1)).unwrap();
        store.dispatch(RoutineAction::AdjustHours(1)).unwrap();
        let err = store.dispatch(RoutineAction::SaveHourEdit).unwrap_err();

        assert!(matches!(err, RoutineError::HourOrder(_)));
        assert!(store.state().hour_editor.is_open());
        let message = store.state().validation_message.as_deref().unwrap();
        assert!(message.contains("10:00"));
        assert_eq!(
            store.current_table().unwrap().hour_labels()[1],
            HourLabel::Unset
        );

        store.dispatch(RoutineAction::CancelHourEdit).unwrap();
        assert!(store.state().validation_message.is_none());
    }

    #[test]
    fn identical_cell_commit_does_not_bump_revision() {
        let mut store = two_week_store();
        let commit = || RoutineAction::CommitCell {
            row: 0,
            column: 2,
            markup: "<b>Run</b>".to_string(),
        };

        assert_eq!(store.dispatch(commit()).unwrap(), Applied::Changed);
        let revision = store.state().revision;
        assert_eq!(store.dispatch(commit()).unwrap(), Applied::Unchanged);
        assert_eq!(store.state().revision, revision);
        assert_eq!(store.current_table().unwrap().cell(0, 2), Some("<b>Run</b>"));
    }

    #[test]
    fn actions_without_weeks_are_rejected() {
        let mut store = RoutineStore::new(RoutineSettings::default());
        assert!(matches!(
            store.dispatch(RoutineAction::AppendRow),
            Err(RoutineError::NoActiveWeeks)
        ));
        assert!(matches!(
            store.dispatch(RoutineAction::SaveHourEdit),
            Err(RoutineError::NoActiveWeeks)
        ));
        assert_eq!(store.state().revision, 0);
    }

    #[test]
    fn reset_clears_state_but_keeps_revision_counting() {
        let mut store = two_week_store();
        let revision = store.state().revision;
        store.dispatch(RoutineAction::Reset).unwrap();

        assert!(store.state().editing_weeks.is_empty());
        assert!(store.state().duration_weeks.is_none());
        assert_eq!(store.state().revision, revision + 1);
    }
}
