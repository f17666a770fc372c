//! Startup registry of mapped entity types.
//!
//! # Responsibility
//! - Collect table schemas for every entity type the application persists.
//! - Apply the resulting DDL atomically when a connection is bootstrapped.
//!
//! # Invariants
//! - A table is registered at most once; repeated registration is a no-op.
//! - Schema application is idempotent (`IF NOT EXISTS` everywhere).

use crate::db::DbResult;
use crate::mapping::configuration::EntityConfiguration;
use crate::mapping::table::TableSchema;
use log::{debug, info};
use rusqlite::Connection;

/// Mapping metadata registered at startup.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    tables: Vec<TableSchema>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the mapping of `E`.
    pub fn register<E: EntityConfiguration>(&mut self) -> &mut Self {
        if self.is_registered(E::TABLE) {
            debug!(
                "event=model_register module=mapping status=skipped table={}",
                E::TABLE
            );
            return self;
        }
        self.tables.push(E::table_schema());
        self
    }

    pub fn is_registered(&self, table: &str) -> bool {
        self.tables.iter().any(|schema| schema.table == table)
    }

    pub fn tables(&self) -> &[TableSchema] {
        &self.tables
    }

    /// Creates every registered table and index in one transaction.
    pub fn ensure_schema(&self, conn: &mut Connection) -> DbResult<()> {
        let tx = conn.transaction()?;
        for schema in &self.tables {
            tx.execute_batch(&schema.create_table_sql())?;
            for index_sql in schema.create_index_sql() {
                tx.execute_batch(&index_sql)?;
            }
        }
        tx.commit()?;

        info!(
            "event=schema_apply module=mapping status=ok tables={}",
            self.tables.len()
        );
        Ok(())
    }
}
