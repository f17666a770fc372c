//! Audited repository and store error types.
//!
//! # Responsibility
//! - Apply the audit/soft-delete policy uniformly to any mapped entity type.
//! - Define the error surface of committing and reading staged changes.
//!
//! # Invariants
//! - Repository operations never stage a physical delete.
//! - All stamps written by one repository call share one timestamp.

pub mod audited_repo;
pub mod error;
