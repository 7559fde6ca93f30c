use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::error::TarefaError;

use super::migrations;

/// Open a connection to an existing database. Returns error if not initialized.
pub fn open_db(path: &Path) -> Result<Connection, TarefaError> {
    if !path.exists() {
        return Err(TarefaError::not_initialized(&path.to_string_lossy()));
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the database: create directories, database, and run migrations.
pub fn init_db(path: &Path) -> Result<PathBuf, TarefaError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TarefaError::database(e.to_string()))?;
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(path.to_path_buf())
}

/// Migrated in-memory database.
pub fn open_in_memory() -> Result<Connection, TarefaError> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), TarefaError> {
    // journal_mode returns a row, so it cannot go through execute_batch.
    let _mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
    conn.execute_batch(
        "PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
