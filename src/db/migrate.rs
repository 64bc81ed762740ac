use crate::errors::AppResult;
use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if the `records` table exists.
fn records_table_exists(conn: &Connection) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name='records'")?;
    let exists: Option<String> = stmt.query_row([], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_migration(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the `records` table. `id` is AUTOINCREMENT so ids are never reused.
fn create_records_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS records (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name    TEXT NOT NULL CHECK(length(first_name) > 0),
            last_name     TEXT NOT NULL CHECK(length(last_name) > 0),
            timestamp     TEXT NOT NULL,
            action        TEXT NOT NULL CHECK(action IN
                              ('TIME_IN','LUNCH_OUT','LUNCH_IN','TIME_OUT','UNIVERSITY_ACTIVITY')),
            action_label  TEXT NOT NULL,
            sync_status   TEXT NOT NULL DEFAULT 'pending' CHECK(sync_status IN ('pending','synced')),
            created_at    TEXT NOT NULL,
            synced_at     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_records_sync_status ON records(sync_status);
        CREATE INDEX IF NOT EXISTS idx_records_timestamp ON records(timestamp);
        "#,
    )?;
    Ok(())
}

/// Refuse any write that would move a synced record back to pending.
fn create_one_way_status_trigger(conn: &Connection) -> Result<()> {
    let version = "20260110_0002_one_way_sync_status";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        CREATE TRIGGER IF NOT EXISTS trg_records_status_one_way
        BEFORE UPDATE OF sync_status ON records
        WHEN OLD.sync_status = 'synced' AND NEW.sync_status <> 'synced'
        BEGIN
            SELECT RAISE(ABORT, 'sync_status cannot revert from synced');
        END;
        "#,
    )?;

    mark_migration(conn, version, "Added one-way sync_status trigger")?;
    info!(version, "migration applied");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked when the record store is opened.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    let version = "20260110_0001_create_records";
    if !records_table_exists(conn)? {
        create_records_table(conn)?;
        mark_migration(conn, version, "Created records table")?;
        info!(version, "migration applied");
    }

    create_one_way_status_trigger(conn)?;

    Ok(())
}
