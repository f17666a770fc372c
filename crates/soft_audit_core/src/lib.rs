//! Audited, soft-deleting repository layer over SQLite.
//!
//! Entities embed an [`AuditInfo`] record and implement [`EntityConfiguration`];
//! an [`AuditedRepository`] stamps create/update/delete audit fields on them
//! and turns every staged removal into a soft delete before the
//! [`SqliteSession`] commits the unit of work.

pub mod db;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod repo;
pub mod session;
pub mod tracking;

pub use db::{open_db, open_db_in_memory, open_db_with, DbError, DbOptions, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use mapping::configuration::{configure_audit_columns, EntityConfiguration};
pub use mapping::registry::ModelRegistry;
pub use mapping::table::{ColumnDef, IndexDef, PropertyBuilder, SqlType, TableBuilder, TableSchema};
pub use model::audit::{AuditInfo, UserId};
pub use model::entity::{Auditable, EntityKey};
pub use model::status::Status;
pub use repo::audited_repo::{AuditRepository, AuditedRepository};
pub use repo::error::{StoreError, StoreResult};
pub use session::{SaveSummary, SqliteSession};
pub use tracking::{ChangeTracker, EntryKey, EntryState, StagedEntity, TrackedEntry};
