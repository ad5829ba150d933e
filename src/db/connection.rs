use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::TaskError;

use super::migrations;

/// Open the task store at `path`, creating it (and parent directories) on
/// first use, and bring the schema up to date.
pub fn open(path: &Path) -> Result<Connection, TaskError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TaskError::database(e.to_string()))?;
        }
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), TaskError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;",
    )?;
    Ok(())
}
