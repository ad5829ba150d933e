use rusqlite::Connection;

use crate::error::TaskError;

pub fn run_migrations(conn: &Connection) -> Result<(), TaskError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS tasks (
            id TEXT PRIMARY KEY,
            owner TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            due_date TEXT,
            priority TEXT NOT NULL DEFAULT 'medium'
                CHECK (priority IN ('low', 'medium', 'high')),
            status TEXT NOT NULL DEFAULT 'To Do'
                CHECK (status IN ('To Do', 'In Progress', 'Done')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_owner ON tasks(owner);
        CREATE INDEX IF NOT EXISTS idx_tasks_owner_status ON tasks(owner, status);
        ",
    )?;
    Ok(())
}
