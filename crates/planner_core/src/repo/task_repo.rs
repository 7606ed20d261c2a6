//! Task repository.
//!
//! Tasks are owned by the task list feature; the routine view only reads
//! them. The whole array is replaced on write.

use crate::model::task::Task;
use crate::repo::kv_store::{load_array, save_array, RepoResult, SqliteKeyValueStore, TASKS_KEY};
use chrono::NaiveDate;
use rusqlite::Connection;

pub trait TaskRepository {
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
    fn replace_tasks(&self, tasks: &[Task]) -> RepoResult<()>;

    /// Tasks shown on `date`, given the current day `today`.
    fn tasks_on(&self, date: NaiveDate, today: NaiveDate) -> RepoResult<Vec<Task>> {
        Ok(self
            .list_tasks()?
            .into_iter()
            .filter(|task| task.falls_on(date, today))
            .collect())
    }
}

pub struct SqliteTaskRepository<'conn> {
    store: SqliteKeyValueStore<'conn>,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            store: SqliteKeyValueStore::try_new(conn)?,
        })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        load_array(&self.store, TASKS_KEY)
    }

    fn replace_tasks(&self, tasks: &[Task]) -> RepoResult<()> {
        save_array(&self.store, TASKS_KEY, tasks)
    }
}
