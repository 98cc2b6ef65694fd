#![forbid(unsafe_code)]

mod error;
mod migrations;
mod requests;

pub use error::StoreError;
pub use requests::{CreateTaskRequest, UpdateTaskRequest};

use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tp_core::{Patch, Priority, Status, Task};

const DB_FILE: &str = "task-planner.db";

const TASK_COLUMNS: &str =
    "id, title, description, priority, status, category, due_date, created_at, updated_at";

/// Persistent task store behind a single SQLite connection.
///
/// One instance owns exactly one connection; construct instances explicitly
/// and inject them so tests can run against independent databases. Mutating
/// operations are durable by the time they return (WAL journal, synchronous
/// calls).
#[derive(Debug)]
pub struct TaskStore {
    conn: Connection,
    storage_dir: PathBuf,
}

impl TaskStore {
    /// Opens (creating if needed) the database under `storage_dir` and runs
    /// every pending migration. A migration failure propagates as a fatal
    /// error; the store must not accept traffic against an unsound schema.
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let mut conn = Connection::open(storage_dir.join(DB_FILE))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;\n\
             PRAGMA foreign_keys=ON;",
        )?;

        migrations::run(&mut conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Drops the managed tables and re-migrates, yielding an empty store.
    /// Destructive; intended for test setup, not production use.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        migrations::reset(&mut self.conn)
    }

    /// All tasks, most recently created first. Ties on `created_at` follow
    /// the storage's default row order (insertion order).
    pub fn find_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map([], map_task)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn find_by_id(&self, id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                map_task,
            )
            .optional()?)
    }

    /// Inserts a new task and returns the canonical record re-read from
    /// storage, so storage-assigned fields (id, timestamps) are
    /// authoritative.
    pub fn create(&mut self, request: CreateTaskRequest) -> Result<Task, StoreError> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO tasks(title, description, priority, status, category, due_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                request.title,
                request.description.unwrap_or_default(),
                request.priority.unwrap_or(Priority::Medium).as_str(),
                request.status.unwrap_or(Status::Pending).as_str(),
                request.category.unwrap_or_else(|| "general".to_string()),
                request.due_date,
            ],
        )?;

        let id = tx.last_insert_rowid();
        let task = tx.query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![id],
            map_task,
        )?;

        tx.commit()?;
        Ok(task)
    }

    /// Partial update: `None` fields keep their stored value, the tri-state
    /// `due_date` distinguishes keep / clear / set. `updated_at` is
    /// refreshed on every successful call, even when no visible field
    /// changed. Returns `None` when no row matches the id.
    pub fn update(
        &mut self,
        id: i64,
        request: UpdateTaskRequest,
    ) -> Result<Option<Task>, StoreError> {
        let tx = self.conn.transaction()?;

        let Some(current) = tx
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                params![id],
                map_task,
            )
            .optional()?
        else {
            return Ok(None);
        };

        let title = request.title.unwrap_or(current.title);
        let description = request.description.unwrap_or(current.description);
        let priority = request.priority.unwrap_or(current.priority);
        let status = request.status.unwrap_or(current.status);
        let category = request.category.unwrap_or(current.category);
        let due_date = match request.due_date {
            Patch::Unset => current.due_date,
            Patch::Clear => None,
            Patch::Set(value) => Some(value),
        };

        tx.execute(
            "UPDATE tasks \
             SET title = ?2, description = ?3, priority = ?4, status = ?5, category = ?6, \
                 due_date = ?7, updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?1",
            params![
                id,
                title,
                description,
                priority.as_str(),
                status.as_str(),
                category,
                due_date,
            ],
        )?;

        let task = tx.query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![id],
            map_task,
        )?;

        tx.commit()?;
        Ok(Some(task))
    }

    /// Hard delete. Returns whether a row was actually removed.
    pub fn remove(&mut self, id: i64) -> Result<bool, StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}

fn map_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    let priority: String = row.get(3)?;
    let status: String = row.get(4)?;
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        // Validation keeps these columns inside their sets; the fallback
        // mirrors the column defaults.
        priority: Priority::parse(&priority).unwrap_or(Priority::Medium),
        status: Status::parse(&status).unwrap_or(Status::Pending),
        category: row.get(5)?,
        due_date: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
