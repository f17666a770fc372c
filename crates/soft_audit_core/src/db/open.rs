//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections.
//! - Apply `DbOptions` pragmas and the registered table mappings.
//!
//! # Invariants
//! - Returned connections have every registered table and index created.

use super::{DbOptions, DbResult};
use crate::mapping::registry::ModelRegistry;
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::Instant;

/// Opens a SQLite database file with default options.
pub fn open_db(path: impl AsRef<Path>, registry: &ModelRegistry) -> DbResult<Connection> {
    open_db_with(path, &DbOptions::default(), registry)
}

/// Opens a SQLite database file and applies the registered mappings.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db_with(
    path: impl AsRef<Path>,
    options: &DbOptions,
    registry: &ModelRegistry,
) -> DbResult<Connection> {
    open_logged("file", options, registry, || Connection::open(path))
}

/// Opens an in-memory SQLite database and applies the registered mappings.
pub fn open_db_in_memory(registry: &ModelRegistry) -> DbResult<Connection> {
    open_logged(
        "memory",
        &DbOptions::default(),
        registry,
        Connection::open_in_memory,
    )
}

fn open_logged(
    mode: &str,
    options: &DbOptions,
    registry: &ModelRegistry,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_open_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, options, registry) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={} duration_ms={}",
                mode,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} duration_ms={} error_code=db_bootstrap_failed error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(
    conn: &mut Connection,
    options: &DbOptions,
    registry: &ModelRegistry,
) -> DbResult<()> {
    let foreign_keys = if options.foreign_keys { "ON" } else { "OFF" };
    conn.execute_batch(&format!("PRAGMA foreign_keys = {foreign_keys};"))?;
    conn.busy_timeout(options.busy_timeout())?;
    registry.ensure_schema(conn)?;
    Ok(())
}
