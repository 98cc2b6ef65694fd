#![forbid(unsafe_code)]

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::StoreError;

/// A named, idempotent schema-change unit. The id is the ledger key; a
/// migration whose id is already in the ledger is never re-executed.
struct Migration {
    id: &'static str,
    statement: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    id: "001_create_tasks_table",
    statement: "\
        CREATE TABLE IF NOT EXISTS tasks (\n\
          id INTEGER PRIMARY KEY AUTOINCREMENT,\n\
          title TEXT NOT NULL,\n\
          description TEXT DEFAULT '',\n\
          priority TEXT NOT NULL DEFAULT 'medium',\n\
          status TEXT NOT NULL DEFAULT 'pending',\n\
          category TEXT NOT NULL DEFAULT 'general',\n\
          due_date TEXT,\n\
          created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,\n\
          updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP\n\
        )",
}];

/// Applies every yet-unapplied migration in declaration order.
///
/// Safe to call on every process start; a statement failure leaves the
/// ledger untouched for that migration and propagates as a fatal error.
pub(crate) fn run(conn: &mut Connection) -> Result<(), StoreError> {
    ensure_ledger(conn)?;

    for migration in MIGRATIONS {
        if is_applied(conn, migration.id)? {
            continue;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(migration.statement)
            .map_err(|source| StoreError::Migration {
                id: migration.id,
                source,
            })?;
        tx.execute(
            "INSERT INTO migrations(id) VALUES (?1)",
            params![migration.id],
        )?;
        tx.commit()?;
    }

    Ok(())
}

/// Drops the managed tables and re-runs every migration. Destructive;
/// intended for test isolation only.
pub(crate) fn reset(conn: &mut Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "DROP TABLE IF EXISTS tasks;\n\
         DROP TABLE IF EXISTS migrations;",
    )?;
    run(conn)
}

fn ensure_ledger(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS migrations (\n\
           id TEXT PRIMARY KEY,\n\
           applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP\n\
         )",
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, id: &str) -> Result<bool, StoreError> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM migrations WHERE id = ?1",
            params![id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some())
}
