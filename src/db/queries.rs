use crate::errors::{AppError, AppResult};
use crate::models::action::Action;
use crate::models::record::{NewRecord, StoredRecord, SyncStatus, format_instant, parse_instant};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const SELECT_RECORDS: &str = "SELECT id, first_name, last_name, timestamp, action, action_label,
        sync_status, created_at, synced_at
 FROM records";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn instant_column(row: &Row, name: &str, idx: usize) -> Result<DateTime<Utc>> {
    let raw: String = row.get(name)?;
    parse_instant(&raw).map_err(|e| conversion_error(idx, e))
}

pub fn map_row(row: &Row) -> Result<StoredRecord> {
    let action_str: String = row.get("action")?;
    let action = Action::from_code(&action_str).ok_or_else(|| {
        conversion_error(4, AppError::InvalidAction(format!("Invalid action: {}", action_str)))
    })?;

    let status_str: String = row.get("sync_status")?;
    let sync_status = SyncStatus::from_db_str(&status_str).ok_or_else(|| {
        conversion_error(
            6,
            AppError::Other(format!("Invalid sync status: {}", status_str)),
        )
    })?;

    let synced_at = match row.get::<_, Option<String>>("synced_at")? {
        Some(raw) => Some(parse_instant(&raw).map_err(|e| conversion_error(8, e))?),
        None => None,
    };

    Ok(StoredRecord {
        id: row.get("id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        timestamp: instant_column(row, "timestamp", 3)?,
        action,
        action_label: row.get("action_label")?,
        sync_status,
        created_at: instant_column(row, "created_at", 7)?,
        synced_at,
    })
}

/// Insert a new pending record and return its id.
pub fn insert_record(conn: &Connection, rec: &NewRecord, created_at: &DateTime<Utc>) -> Result<i64> {
    conn.execute(
        "INSERT INTO records (first_name, last_name, timestamp, action, action_label, sync_status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            rec.first_name,
            rec.last_name,
            format_instant(&rec.timestamp),
            rec.action.code(),
            rec.action_label,
            SyncStatus::Pending.to_db_str(),
            format_instant(created_at),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_record(conn: &Connection, id: i64) -> AppResult<Option<StoredRecord>> {
    let sql = format!("{SELECT_RECORDS} WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_row).optional()?)
}

/// Transition `id` to synced. `synced_at` is only written the first time.
/// Returns the number of rows matched (0 when the id does not exist).
pub fn mark_synced(conn: &Connection, id: i64, synced_at: &DateTime<Utc>) -> Result<usize> {
    conn.execute(
        "UPDATE records
         SET sync_status = 'synced',
             synced_at = COALESCE(synced_at, ?1)
         WHERE id = ?2",
        params![format_instant(synced_at), id],
    )
}

pub fn load_by_status(conn: &Connection, status: SyncStatus) -> AppResult<Vec<StoredRecord>> {
    let sql = format!("{SELECT_RECORDS} WHERE sync_status = ?1 ORDER BY id ASC");
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([status.to_db_str()], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_all(conn: &Connection) -> AppResult<Vec<StoredRecord>> {
    let sql = format!("{SELECT_RECORDS} ORDER BY id ASC");
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// COUNT over the same predicate `load_by_status(Pending)` uses.
pub fn count_by_status(conn: &Connection, status: SyncStatus) -> AppResult<usize> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM records WHERE sync_status = ?1",
        [status.to_db_str()],
        |row| row.get(0),
    )?;
    Ok(n as usize)
}
