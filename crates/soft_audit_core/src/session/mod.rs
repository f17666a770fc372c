//! SQLite-backed unit of work.
//!
//! # Responsibility
//! - Pair one connection with one change tracker for a business transaction.
//! - Commit staged changes in a single SQLite transaction.
//! - Provide the minimal reads needed to observe persisted audit state.
//!
//! # Invariants
//! - A failed commit rolls back and leaves the tracker as it was.
//! - Soft-deleted rows are hidden from `find` unless explicitly requested.

mod rows;
mod sqlite_session;

pub use sqlite_session::{SaveSummary, SqliteSession};
