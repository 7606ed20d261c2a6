//! Study library repository.
//!
//! # Invariants
//! - Entries are stored as one array under `studyItems`.
//! - Category listings are ordered newest first, then by id for stability.

use crate::model::study::{StudyCategory, StudyEntry, StudyItemId};
use crate::repo::kv_store::{
    load_array, save_array, RepoError, RepoResult, SqliteKeyValueStore, STUDY_ITEMS_KEY,
};
use rusqlite::Connection;

pub trait StudyRepository {
    fn list_entries(&self) -> RepoResult<Vec<StudyEntry>>;
    fn list_by_category(&self, category: StudyCategory) -> RepoResult<Vec<StudyEntry>>;
    /// Inserts or wholly replaces one entry.
    fn put_entry(&self, entry: &StudyEntry) -> RepoResult<()>;
    fn delete_entry(&self, id: StudyItemId) -> RepoResult<()>;
}

pub struct SqliteStudyRepository<'conn> {
    store: SqliteKeyValueStore<'conn>,
}

impl<'conn> SqliteStudyRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self {
            store: SqliteKeyValueStore::try_new(conn)?,
        })
    }
}

impl StudyRepository for SqliteStudyRepository<'_> {
    fn list_entries(&self) -> RepoResult<Vec<StudyEntry>> {
        load_array(&self.store, STUDY_ITEMS_KEY)
    }

    fn list_by_category(&self, category: StudyCategory) -> RepoResult<Vec<StudyEntry>> {
        let mut entries: Vec<StudyEntry> = self
            .list_entries()?
            .into_iter()
            .filter(|entry| entry.item.category() == category)
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    fn put_entry(&self, entry: &StudyEntry) -> RepoResult<()> {
        let mut entries = self.list_entries()?;
        match entries.iter_mut().find(|existing| existing.id == entry.id) {
            Some(existing) => *existing = entry.clone(),
            None => entries.push(entry.clone()),
        }
        save_array(&self.store, STUDY_ITEMS_KEY, &entries)
    }

    fn delete_entry(&self, id: StudyItemId) -> RepoResult<()> {
        let mut entries = self.list_entries()?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(RepoError::NotFound(id));
        }
        save_array(&self.store, STUDY_ITEMS_KEY, &entries)
    }
}
