//! Domain model for routines, tasks and study items.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own serialization shapes of every record kept in the keyed store.
//!
//! # Invariants
//! - Every persisted record is identified by a stable UUID.
//! - Rich text crosses the boundary only as sanitized markup.

pub mod clock;
pub mod rich_text;
pub mod routine;
pub mod study;
pub mod task;
