//! Audit domain model shared by every persisted entity.
//!
//! # Responsibility
//! - Define the lifecycle `Status` and the embedded `AuditInfo` record.
//! - Define the `Auditable` capability that repositories are generic over.
//!
//! # Invariants
//! - Create stamps are written once, when the entity is first added.
//! - Deletion is represented by `Status::Deleted` plus delete stamps, never
//!   by removing the row.

pub mod audit;
pub mod entity;
pub mod status;
