//! Keyed JSON store over the `kv_store` table.
//!
//! # Responsibility
//! - Hold one JSON document per key (`savedRoutines`, `tasks`, ...).
//! - Provide typed array load/save helpers for repositories.
//!
//! # Invariants
//! - A missing key reads as an empty array.
//! - Writes replace the whole value for a key.

use crate::db::DbError;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Key holding the `SavedRoutine` array.
pub const ROUTINES_KEY: &str = "savedRoutines";
/// Key holding the `Task` array.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the `StudyEntry` array.
pub const STUDY_ITEMS_KEY: &str = "studyItems";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for keyed storage and record decoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Record with this id is not stored under the key.
    NotFound(Uuid),
    /// Stored JSON could not be decoded.
    InvalidData(String),
    /// Record could not be encoded to JSON.
    Encode(serde_json::Error),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Encode(err) => write!(f, "failed to encode record: {err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw keyed storage contract.
pub trait KeyValueStore {
    fn get_raw(&self, key: &str) -> RepoResult<Option<String>>;
    fn put_raw(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Returns whether a value existed.
    fn remove(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed keyed store.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when `kv_store` does not exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable("kv_store"));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get_raw(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=kv_put module=repo status=ok key={} bytes={}",
            key,
            value.len()
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

/// Loads a JSON array stored under `key`; missing keys yield an empty list.
pub fn load_array<T, S>(store: &S, key: &str) -> RepoResult<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get_raw(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|err| RepoError::InvalidData(format!("key `{key}`: {err}"))),
        None => Ok(Vec::new()),
    }
}

/// Replaces the JSON array stored under `key`.
pub fn save_array<T, S>(store: &S, key: &str, items: &[T]) -> RepoResult<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(items).map_err(RepoError::Encode)?;
    store.put_raw(key, &raw)
}
