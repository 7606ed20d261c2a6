//! Routine persistence use-cases.
//!
//! # Responsibility
//! - Turn the editing state of a `RoutineStore` into a `SavedRoutine` and
//!   back.
//!
//! # Invariants
//! - Saving while a routine is loaded overwrites it, keeping `id` and
//!   `created_at`.
//! - Deleting the loaded routine resets the store.

use crate::model::routine::{duration_label, RoutineId, SavedRoutine};
use crate::repo::kv_store::{RepoError, RepoResult};
use crate::repo::routine_repo::RoutineRepository;
use crate::routine::RoutineError;
use crate::sanitize::MarkupSanitizer;
use crate::store::{RoutineAction, RoutineStore};
use chrono::Utc;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug)]
pub enum RoutineServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// Store has no weeks to save.
    NothingToSave,
    RoutineNotFound(RoutineId),
    Store(RoutineError),
    Repo(RepoError),
}

impl Display for RoutineServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "routine name must not be blank"),
            Self::NothingToSave => write!(f, "no routine weeks to save"),
            Self::RoutineNotFound(id) => write!(f, "routine not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RoutineServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RoutineError> for RoutineServiceError {
    fn from(value: RoutineError) -> Self {
        Self::Store(value)
    }
}

impl From<RepoError> for RoutineServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::RoutineNotFound(id),
            other => Self::Repo(other),
        }
    }
}

pub struct RoutineService<R: RoutineRepository> {
    repo: R,
}

impl<R: RoutineRepository> RoutineService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> RepoResult<Vec<SavedRoutine>> {
        self.repo.list_routines()
    }

    /// Saves the store's weeks under `name`.
    ///
    /// Creates a new routine, or overwrites the loaded one.
    pub fn save_current<S: MarkupSanitizer>(
        &self,
        store: &mut RoutineStore<S>,
        name: &str,
    ) -> Result<SavedRoutine, RoutineServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoutineServiceError::InvalidName);
        }

        let state = store.state();
        let (Some(first), Some(last)) = (state.editing_weeks.first(), state.editing_weeks.last())
        else {
            return Err(RoutineServiceError::NothingToSave);
        };

        let (id, created_at) = match &state.loaded {
            Some(loaded) => (loaded.id, loaded.created_at),
            None => (Uuid::new_v4(), Utc::now().timestamp_millis()),
        };
        let routine = SavedRoutine {
            id,
            name: name.to_string(),
            duration_label: duration_label(state.editing_weeks.len()),
            start_date: first.full_start_date,
            end_date: last.full_end_date(),
            created_at,
            weeks: state.editing_weeks.clone(),
        };

        self.repo.put_routine(&routine)?;
        store.attach(&routine);
        info!(
            "event=routine_save module=service status=ok routine_id={} weeks={}",
            routine.id,
            routine.weeks.len()
        );
        Ok(routine)
    }

    /// Loads routine `id` into the store for editing.
    pub fn load<S: MarkupSanitizer>(
        &self,
        store: &mut RoutineStore<S>,
        id: RoutineId,
    ) -> Result<SavedRoutine, RoutineServiceError> {
        let routine = self
            .repo
            .get_routine(id)?
            .ok_or(RoutineServiceError::RoutineNotFound(id))?;
        store.dispatch(RoutineAction::LoadRoutine(routine.clone()))?;
        Ok(routine)
    }

    /// Deletes routine `id`; resets the store when it was loaded.
    pub fn delete<S: MarkupSanitizer>(
        &self,
        store: &mut RoutineStore<S>,
        id: RoutineId,
    ) -> Result<(), RoutineServiceError> {
        self.repo.delete_routine(id)?;
        let was_loaded = store
            .state()
            .loaded
            .as_ref()
            .is_some_and(|loaded| loaded.id == id);
        if was_loaded {
            store.dispatch(RoutineAction::Reset)?;
        }
        info!(
            "event=routine_delete module=service status=ok routine_id={} was_loaded={}",
            id, was_loaded
        );
        Ok(())
    }
}
