use crate::mapping::configuration::{EntityConfiguration, ID_COLUMN, STATUS_COLUMN};
use crate::model::entity::EntityKey;
use crate::model::status::Status;
use crate::repo::audited_repo::AuditedRepository;
use crate::repo::error::StoreResult;
use crate::session::rows::{bool_to_int, delete_staged, insert_staged, read_entity, update_staged};
use crate::tracking::{ChangeTracker, EntryKey, EntryState};
use log::{error, info, warn};
use rusqlite::{params, Connection};
use std::time::Instant;

/// Row counts written by one successful commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl SaveSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }
}

/// Unit of work over one SQLite connection.
pub struct SqliteSession<'conn> {
    conn: &'conn mut Connection,
    tracker: ChangeTracker,
}

impl<'conn> SqliteSession<'conn> {
    /// Starts a unit of work on a connection whose mappings are applied.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self {
            conn,
            tracker: ChangeTracker::new(),
        }
    }

    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ChangeTracker {
        &mut self.tracker
    }

    /// Audited repository for `E` staging into this session.
    pub fn repository<E: EntityConfiguration>(&mut self) -> AuditedRepository<'_, E> {
        AuditedRepository::new(&mut self.tracker)
    }

    /// Writes every pending entry in one transaction.
    ///
    /// Inserted entities receive their store-generated ids. On error nothing is
    /// written and the tracker keeps its pending entries.
    ///
    /// # Errors
    /// - `StoreError::NotFound` when a modified or deleted row is missing.
    /// - `StoreError::MissingKey` when a modified or deleted entry has no id.
    /// - `StoreError::Db` for SQLite failures, including constraint violations.
    pub fn save_changes(&mut self) -> StoreResult<SaveSummary> {
        let started_at = Instant::now();

        let (summary, generated) = match write_pending(self.conn, &self.tracker) {
            Ok(written) => written,
            Err(err) => {
                error!(
                    "event=save_changes module=session status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        for (key, row_id) in generated {
            let assigned = self
                .tracker
                .entry_mut(key)
                .is_some_and(|entry| entry.entity_mut().assign_row_id(row_id));
            if !assigned {
                warn!(
                    "event=save_changes module=session status=warn reason=id_not_assigned row_id={}",
                    row_id
                );
            }
        }
        self.tracker.accept_all_changes();

        info!(
            "event=save_changes module=session status=ok duration_ms={} inserted={} updated={} deleted={}",
            started_at.elapsed().as_millis(),
            summary.inserted,
            summary.updated,
            summary.deleted
        );
        Ok(summary)
    }

    /// Loads one entity by id. Soft-deleted rows are returned only when
    /// `include_deleted` is set.
    pub fn find<E: EntityConfiguration>(
        &self,
        id: E::Key,
        include_deleted: bool,
    ) -> StoreResult<Option<E>> {
        let schema = E::table_schema();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}
             FROM {}
             WHERE {ID_COLUMN} = ?1
               AND (?2 = 1 OR {STATUS_COLUMN} <> ?3);",
            schema.select_list(),
            E::TABLE
        ))?;

        let mut rows = stmt.query(params![
            id.to_row_id(),
            bool_to_int(include_deleted),
            Status::Deleted.as_db()
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(read_entity::<E>(row)?));
        }

        Ok(None)
    }

    /// Lists every row of `E` with the given status, ordered by id.
    pub fn list_by_status<E: EntityConfiguration>(&self, status: Status) -> StoreResult<Vec<E>> {
        let schema = E::table_schema();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}
             FROM {}
             WHERE {STATUS_COLUMN} = ?1
             ORDER BY {ID_COLUMN} ASC;",
            schema.select_list(),
            E::TABLE
        ))?;

        let mut rows = stmt.query([status.as_db()])?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            entities.push(read_entity::<E>(row)?);
        }

        Ok(entities)
    }
}

type Written = (SaveSummary, Vec<(EntryKey, i64)>);

fn write_pending(conn: &mut Connection, tracker: &ChangeTracker) -> StoreResult<Written> {
    let mut summary = SaveSummary::default();
    let mut generated = Vec::new();

    let tx = conn.transaction()?;
    for entry in tracker.entries() {
        match entry.state() {
            EntryState::Added => {
                let row_id = insert_staged(&tx, entry.entity())?;
                generated.push((entry.key(), row_id));
                summary.inserted += 1;
            }
            EntryState::Modified => {
                update_staged(&tx, entry.entity())?;
                summary.updated += 1;
            }
            EntryState::Deleted => {
                delete_staged(&tx, entry.entity())?;
                summary.deleted += 1;
            }
            EntryState::Unchanged | EntryState::Detached => {}
        }
    }
    tx.commit()?;

    Ok((summary, generated))
}
