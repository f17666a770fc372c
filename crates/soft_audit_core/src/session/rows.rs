//! Row-level SQL for staged entities.

use crate::mapping::configuration::{
    EntityConfiguration, CREATE_DATE_TIME_COLUMN, CREATE_USER_ID_COLUMN, DELETE_DATE_TIME_COLUMN,
    DELETE_USER_ID_COLUMN, ID_COLUMN, STATUS_COLUMN, UPDATE_DATE_TIME_COLUMN,
    UPDATE_USER_ID_COLUMN,
};
use crate::model::audit::AuditInfo;
use crate::model::entity::EntityKey;
use crate::model::status::Status;
use crate::repo::error::{StoreError, StoreResult};
use crate::tracking::StagedEntity;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Row, Transaction};

/// Inserts one staged entity and returns the rowid the store assigned.
pub(crate) fn insert_staged(tx: &Transaction<'_>, entity: &dyn StagedEntity) -> StoreResult<i64> {
    let mut columns = Vec::new();
    let mut values = Vec::new();

    if let Some(row_id) = entity.row_id() {
        columns.push(ID_COLUMN);
        values.push(Value::Integer(row_id));
    }
    for (column, value) in entity.column_values() {
        columns.push(column);
        values.push(value);
    }

    let placeholders = (1..=values.len())
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        entity.table(),
        columns.join(", "),
        placeholders
    );

    tx.execute(&sql, params_from_iter(values))?;
    Ok(tx.last_insert_rowid())
}

/// Rewrites every mapped column of one staged entity.
pub(crate) fn update_staged(tx: &Transaction<'_>, entity: &dyn StagedEntity) -> StoreResult<()> {
    let table = entity.table();
    let row_id = entity.row_id().ok_or(StoreError::MissingKey { table })?;

    let mut assignments = Vec::new();
    let mut values = Vec::new();
    for (index, (column, value)) in entity.column_values().into_iter().enumerate() {
        assignments.push(format!("{column} = ?{}", index + 1));
        values.push(value);
    }
    values.push(Value::Integer(row_id));

    let sql = format!(
        "UPDATE {} SET {} WHERE {} = ?{};",
        table,
        assignments.join(", "),
        ID_COLUMN,
        values.len()
    );

    let changed = tx.execute(&sql, params_from_iter(values))?;
    if changed == 0 {
        return Err(StoreError::NotFound { table, id: row_id });
    }
    Ok(())
}

/// Physically removes one staged entity.
pub(crate) fn delete_staged(tx: &Transaction<'_>, entity: &dyn StagedEntity) -> StoreResult<()> {
    let table = entity.table();
    let row_id = entity.row_id().ok_or(StoreError::MissingKey { table })?;

    let changed = tx.execute(
        &format!("DELETE FROM {table} WHERE {ID_COLUMN} = ?1;"),
        [row_id],
    )?;
    if changed == 0 {
        return Err(StoreError::NotFound { table, id: row_id });
    }
    Ok(())
}

/// Decodes the audit part of a row and hands the rest to the entity mapping.
pub(crate) fn read_entity<E: EntityConfiguration>(row: &Row<'_>) -> StoreResult<E> {
    let row_id: i64 = row.get(ID_COLUMN)?;
    let id = E::Key::from_row_id(row_id).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "id value `{row_id}` out of range in {}.{ID_COLUMN}",
            E::TABLE
        ))
    })?;

    let status_text: String = row.get(STATUS_COLUMN)?;
    let status = Status::from_db(&status_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid status `{status_text}` in {}.{STATUS_COLUMN}",
            E::TABLE
        ))
    })?;

    let audit = AuditInfo {
        create_date_time: row.get(CREATE_DATE_TIME_COLUMN)?,
        create_user_id: row.get(CREATE_USER_ID_COLUMN)?,
        update_date_time: row.get(UPDATE_DATE_TIME_COLUMN)?,
        update_user_id: row.get(UPDATE_USER_ID_COLUMN)?,
        delete_date_time: row.get(DELETE_DATE_TIME_COLUMN)?,
        delete_user_id: row.get(DELETE_USER_ID_COLUMN)?,
        status,
    };

    Ok(E::read_columns(row, id, audit)?)
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
