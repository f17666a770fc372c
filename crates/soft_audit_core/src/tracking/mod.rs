//! Change tracking for one unit of work.
//!
//! # Responsibility
//! - Stage entities of any mapped type together with a pending-change state.
//! - Expose staged entries for audit re-stamping and state reclassification.
//!
//! # Invariants
//! - A `(type, id)` identity is tracked by at most one entry.
//! - Entry keys are never reused within one tracker.
//!
//! A tracker is scoped to one logical business transaction and assumes
//! exclusive access; it holds no locks.

mod entry;
mod staged;
mod tracker;

pub use entry::{EntryKey, EntryState, TrackedEntry};
pub use staged::{EntityIdentity, StagedEntity};
pub use tracker::ChangeTracker;
