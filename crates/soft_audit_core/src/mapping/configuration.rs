//! Base configuration for auditable entities.
//!
//! # Responsibility
//! - Map the shared audit columns (identity, stamps, status) for every entity.
//! - Let each entity type add its own columns and row conversions on top.
//!
//! # Invariants
//! - `create_date_time`, `create_user_id` and `status` are `NOT NULL`.
//! - `status` is always indexed.

use crate::mapping::table::{SqlType, TableBuilder, TableSchema};
use crate::model::audit::AuditInfo;
use crate::model::entity::Auditable;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::Row;

pub const ID_COLUMN: &str = "id";
pub const CREATE_DATE_TIME_COLUMN: &str = "create_date_time";
pub const CREATE_USER_ID_COLUMN: &str = "create_user_id";
pub const UPDATE_DATE_TIME_COLUMN: &str = "update_date_time";
pub const UPDATE_USER_ID_COLUMN: &str = "update_user_id";
pub const DELETE_DATE_TIME_COLUMN: &str = "delete_date_time";
pub const DELETE_USER_ID_COLUMN: &str = "delete_user_id";
pub const STATUS_COLUMN: &str = "status";

/// Maps the audit columns shared by every auditable entity.
pub fn configure_audit_columns(builder: &mut TableBuilder) {
    builder.identity(ID_COLUMN);

    builder
        .property(CREATE_DATE_TIME_COLUMN, SqlType::Text)
        .required();
    builder
        .property(CREATE_USER_ID_COLUMN, SqlType::Integer)
        .required();

    builder.property(UPDATE_DATE_TIME_COLUMN, SqlType::Text);
    builder.property(UPDATE_USER_ID_COLUMN, SqlType::Integer);

    builder.property(DELETE_DATE_TIME_COLUMN, SqlType::Text);
    builder.property(DELETE_USER_ID_COLUMN, SqlType::Integer);

    builder.property(STATUS_COLUMN, SqlType::Text).required();
    builder.has_index(STATUS_COLUMN);
}

/// Storage mapping of one auditable entity type.
///
/// Implementors declare only their own columns; the audit columns come from
/// [`configure_audit_columns`] and are written/read by the session.
pub trait EntityConfiguration: Auditable + Sized {
    const TABLE: &'static str;

    /// Declares entity-specific columns and indexes.
    fn configure(builder: &mut TableBuilder);

    /// Values for every column declared in [`EntityConfiguration::configure`].
    fn write_columns(&self) -> Vec<(&'static str, Value)>;

    /// Rebuilds the entity from a row whose audit part is already decoded.
    fn read_columns(row: &Row<'_>, id: Self::Key, audit: AuditInfo) -> rusqlite::Result<Self>;

    fn table_schema() -> TableSchema {
        let mut builder = TableBuilder::new(Self::TABLE);
        configure_audit_columns(&mut builder);
        Self::configure(&mut builder);
        builder.build()
    }
}

/// Audit column values in mapping order, identity excluded.
pub fn audit_values(audit: &AuditInfo) -> Vec<(&'static str, Value)> {
    vec![
        (
            CREATE_DATE_TIME_COLUMN,
            datetime_value(audit.create_date_time),
        ),
        (
            CREATE_USER_ID_COLUMN,
            Value::Integer(i64::from(audit.create_user_id)),
        ),
        (
            UPDATE_DATE_TIME_COLUMN,
            audit.update_date_time.map_or(Value::Null, datetime_value),
        ),
        (
            UPDATE_USER_ID_COLUMN,
            optional_user_value(audit.update_user_id),
        ),
        (
            DELETE_DATE_TIME_COLUMN,
            audit.delete_date_time.map_or(Value::Null, datetime_value),
        ),
        (
            DELETE_USER_ID_COLUMN,
            optional_user_value(audit.delete_user_id),
        ),
        (
            STATUS_COLUMN,
            Value::Text(audit.status.as_db().to_string()),
        ),
    ]
}

/// Encodes a timestamp in the text layout rusqlite decodes `DateTime<Utc>` from.
pub fn datetime_value(at: DateTime<Utc>) -> Value {
    Value::Text(at.format("%F %T%.f%:z").to_string())
}

fn optional_user_value(user_id: Option<i32>) -> Value {
    user_id.map_or(Value::Null, |id| Value::Integer(i64::from(id)))
}
