//! Entity-to-table mapping.
//!
//! # Responsibility
//! - Declare the storage shape of auditable entities once, in one place.
//! - Turn declarations into idempotent SQLite DDL applied at startup.
//!
//! # Invariants
//! - Every mapped table carries the audit columns from
//!   `configure_audit_columns`, including the index on `status`.
//! - Identity columns are generated by the store.

pub mod configuration;
pub mod registry;
pub mod table;
