//! Repository layer over the keyed store.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite and JSON encoding details from services.
//!
//! # Invariants
//! - Every record kind lives under exactly one key as a JSON array.
//! - Records are replaced whole; there are no partial field updates.

pub mod kv_store;
pub mod routine_repo;
pub mod study_repo;
pub mod task_repo;
