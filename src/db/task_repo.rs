use chrono::{NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, params_from_iter, Connection};

use crate::error::TaskError;
use crate::models::{Priority, SortKey, StatusFilter, Task, TaskListQuery, TaskStatus};

const TASK_COLUMNS: &str =
    "id, owner, title, description, due_date, priority, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: TaskStatus,
}

/// Allow-list of client-mutable fields. `owner`, `id` and the timestamps are
/// not representable here, so a request body can never touch them.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<TaskStatus>,
}

/// Owner is assigned here, never taken from the request payload.
pub fn create_task(conn: &Connection, owner: &str, new: &NewTask) -> Result<Task, TaskError> {
    let id = ulid::Ulid::new().to_string();
    let now = now_utc();
    conn.execute(
        "INSERT INTO tasks (id, owner, title, description, due_date, priority, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id,
            owner,
            new.title,
            new.description,
            new.due_date.map(|d| d.to_string()),
            new.priority.as_str(),
            new.status.as_str(),
            now,
            now,
        ],
    )?;
    get_task_by_id(conn, &id)
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Task, TaskError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskError::task_not_found(),
        _ => TaskError::from(e),
    })
}

/// Ownership guard for the read path: not-found before forbidden, and a
/// mismatch never leaks the task's fields.
pub fn get_task_for_owner(conn: &Connection, owner: &str, id: &str) -> Result<Task, TaskError> {
    let task = get_task_by_id(conn, id)?;
    if task.owner != owner {
        return Err(TaskError::forbidden());
    }
    Ok(task)
}

/// List the owner's tasks. The `owner = ?1` constraint is unconditional; the
/// optional filters only ever narrow it.
pub fn list_tasks(
    conn: &Connection,
    owner: &str,
    query: &TaskListQuery,
) -> Result<Vec<Task>, TaskError> {
    let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE owner = ?1");
    let mut args: Vec<String> = vec![owner.to_string()];

    // Unrecognized status tokens are bound as-is and match no rows.
    if let StatusFilter::Equals(status) = &query.status {
        args.push(status.clone());
        sql.push_str(&format!(" AND status = ?{}", args.len()));
    }

    if let Some(needle) = &query.search {
        let pattern = format!("%{}%", escape_like(needle));
        args.push(pattern.clone());
        let title_arg = args.len();
        args.push(pattern);
        let desc_arg = args.len();
        sql.push_str(&format!(
            " AND (title LIKE ?{title_arg} ESCAPE '\\' OR description LIKE ?{desc_arg} ESCAPE '\\')"
        ));
    }

    sql.push_str(match query.sort {
        SortKey::DueDate => " ORDER BY due_date ASC",
        // Explicit rank, not lexical order on the stored literals
        SortKey::Priority => {
            " ORDER BY CASE priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END ASC"
        }
        SortKey::Newest => " ORDER BY created_at DESC",
    });

    let mut stmt = conn.prepare(&sql)?;
    let tasks = stmt
        .query_map(params_from_iter(args), row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Apply `changes` to the owner's task as a single conditional statement, so
/// there is no window between the ownership check and the write.
pub fn update_task(
    conn: &Connection,
    owner: &str,
    id: &str,
    changes: &TaskChanges,
) -> Result<Task, TaskError> {
    let mut sets: Vec<String> = Vec::new();
    let mut args: Vec<String> = Vec::new();

    let mut set = |column: &str, value: String, args: &mut Vec<String>| {
        args.push(value);
        sets.push(format!("{column} = ?{}", args.len()));
    };

    if let Some(title) = &changes.title {
        set("title", title.clone(), &mut args);
    }
    if let Some(description) = &changes.description {
        set("description", description.clone(), &mut args);
    }
    if let Some(due_date) = &changes.due_date {
        set("due_date", due_date.to_string(), &mut args);
    }
    if let Some(priority) = &changes.priority {
        set("priority", priority.as_str().to_string(), &mut args);
    }
    if let Some(status) = &changes.status {
        set("status", status.as_str().to_string(), &mut args);
    }
    set("updated_at", now_utc(), &mut args);

    args.push(id.to_string());
    let id_arg = args.len();
    args.push(owner.to_string());
    let owner_arg = args.len();

    let sql = format!(
        "UPDATE tasks SET {} WHERE id = ?{id_arg} AND owner = ?{owner_arg}",
        sets.join(", ")
    );
    let affected = conn.execute(&sql, params_from_iter(args))?;
    if affected == 0 {
        return Err(missing_or_forbidden(conn, id));
    }
    get_task_by_id(conn, id)
}

/// Delete the owner's task, conditional on ownership in the same statement.
pub fn delete_task(conn: &Connection, owner: &str, id: &str) -> Result<(), TaskError> {
    let affected = conn.execute(
        "DELETE FROM tasks WHERE id = ?1 AND owner = ?2",
        params![id, owner],
    )?;
    if affected == 0 {
        return Err(missing_or_forbidden(conn, id));
    }
    Ok(())
}

/// A conditional mutation touched zero rows: classify after the fact. The row
/// existing means it belongs to someone else.
fn missing_or_forbidden(conn: &Connection, id: &str) -> TaskError {
    let exists = conn.query_row(
        "SELECT 1 FROM tasks WHERE id = ?1",
        params![id],
        |_| Ok(()),
    );
    match exists {
        Ok(()) => TaskError::forbidden(),
        Err(rusqlite::Error::QueryReturnedNoRows) => TaskError::task_not_found(),
        Err(e) => TaskError::from(e),
    }
}

/// Escape `LIKE` wildcards so user-supplied search text is matched literally.
fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn now_utc() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        due_date: row
            .get::<_, Option<String>>(4)?
            .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        priority: Priority::from_str(&row.get::<_, String>(5)?).unwrap_or_default(),
        status: TaskStatus::from_str(&row.get::<_, String>(6)?).unwrap_or_default(),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
