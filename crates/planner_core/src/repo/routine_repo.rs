//! Saved routine repository.
//!
//! # Invariants
//! - Routines are stored as one array under `savedRoutines`.
//! - `put_routine` replaces a routine with the same id in place, otherwise
//!   appends; list order is insertion order.

use crate::model::routine::{RoutineId, SavedRoutine};
use crate::repo::kv_store::{
    load_array, save_array, RepoError, RepoResult, SqliteKeyValueStore, ROUTINES_KEY,
};
use log::info;
use rusqlite::Connection;

pub trait RoutineRepository {
    fn list_routines(&self) -> RepoResult<Vec<SavedRoutine>>;
    fn get_routine(&self, id: RoutineId) -> RepoResult<Option<SavedRoutine>>;
    /// Inserts or wholly replaces one routine.
    fn put_routine(&self, routine: &SavedRoutine) -> RepoResult<()>;
    /// Deletes one routine; `NotFound` when absent.
    fn delete_routine(&self, id: RoutineId) -> RepoResult<()>;
}

pub struct SqliteRoutineRepository<'conn> {
    store: SqliteKeyValueStore<'conn>,
}

impl<'conn> SqliteRoutineRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            store: SqliteKeyValueStore::try_new(conn)?,
        })
    }
}

impl RoutineRepository for SqliteRoutineRepository<'_> {
    fn list_routines(&self) -> RepoResult<Vec<SavedRoutine>> {
        load_array(&self.store, ROUTINES_KEY)
    }

    fn get_routine(&self, id: RoutineId) -> RepoResult<Option<SavedRoutine>> {
        Ok(self
            .list_routines()?
            .into_iter()
            .find(|routine| routine.id == id))
    }

    fn put_routine(&self, routine: &SavedRoutine) -> RepoResult<()> {
        let mut routines = self.list_routines()?;
        match routines.iter_mut().find(|existing| existing.id == routine.id) {
            Some(existing) => *existing = routine.clone(),
            None => routines.push(routine.clone()),
        }
        save_array(&self.store, ROUTINES_KEY, &routines)?;
        info!(
            "event=routine_put module=repo status=ok routine_id={} weeks={}",
            routine.id,
            routine.weeks.len()
        );
        Ok(())
    }

    fn delete_routine(&self, id: RoutineId) -> RepoResult<()> {
        let mut routines = self.list_routines()?;
        let before = routines.len();
        routines.retain(|routine| routine.id != id);
        if routines.len() == before {
            return Err(RepoError::NotFound(id));
        }
        save_array(&self.store, ROUTINES_KEY, &routines)?;
        info!(
            "event=routine_delete module=repo status=ok routine_id={}",
            id
        );
        Ok(())
    }
}
