//! Local record store: durable, append-only queue of attendance records.
//!
//! All operations are async and serialized through one connection, so a
//! write is visible to every read issued after it returns.

use crate::db::log::{LogEntry, load_log, ttlog};
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::record::{NewRecord, StoredRecord, SyncStatus, format_instant};
use chrono::{DateTime, SubsecRound, Utc};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct RecordStore {
    pool: Mutex<Option<DbPool>>,
}

impl RecordStore {
    /// A store with no backing database. Every operation fails with
    /// `StorageUnavailable` until `attach` is called.
    pub fn unopened() -> Self {
        Self {
            pool: Mutex::new(None),
        }
    }

    /// Open (creating if needed) and migrate the database at `path`.
    pub async fn open(path: &str) -> AppResult<Self> {
        let store = Self::unopened();
        store.attach(DbPool::new(path)?).await?;
        Ok(store)
    }

    pub async fn open_in_memory() -> AppResult<Self> {
        let store = Self::unopened();
        store.attach(DbPool::in_memory()?).await?;
        Ok(store)
    }

    pub async fn attach(&self, pool: DbPool) -> AppResult<()> {
        run_pending_migrations(&pool.conn)?;
        *self.pool.lock().await = Some(pool);
        Ok(())
    }

    /// Drop the connection. Later calls fail with `StorageUnavailable`.
    pub async fn close(&self) {
        self.pool.lock().await.take();
    }

    pub async fn is_open(&self) -> bool {
        self.pool.lock().await.is_some()
    }

    /// Run `func` against the open pool, or fail with `StorageUnavailable`.
    async fn with_pool<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&DbPool) -> AppResult<T>,
    {
        let guard = self.pool.lock().await;
        let pool = guard.as_ref().ok_or(AppError::StorageUnavailable)?;
        func(pool)
    }

    /// Persist a new record as pending with a fresh id.
    pub async fn append(&self, record: NewRecord) -> AppResult<StoredRecord> {
        self.with_pool(move |pool| {
            let created_at = Utc::now().trunc_subsecs(3);
            let id = queries::insert_record(&pool.conn, &record, &created_at)
                .map_err(|e| AppError::WriteFailed(e.to_string()))?;

            let stored = StoredRecord {
                id,
                first_name: record.first_name,
                last_name: record.last_name,
                timestamp: record.timestamp,
                action: record.action,
                action_label: record.action_label,
                sync_status: SyncStatus::Pending,
                created_at,
                synced_at: None,
            };

            if let Err(e) = ttlog(
                &pool.conn,
                "capture",
                &id.to_string(),
                &format!(
                    "{} {} for {}",
                    stored.action_label,
                    stored.timestamp_str(),
                    stored.full_name()
                ),
            ) {
                warn!(id, error = %e, "audit write failed after append");
            }

            debug!(id, action = stored.action.code(), "record appended");
            Ok(stored)
        })
        .await
    }

    /// Transition one record to synced. The first `synced_at` wins; a repeated
    /// call leaves the record as it is.
    pub(crate) async fn mark_synced(
        &self,
        id: i64,
        synced_at: DateTime<Utc>,
    ) -> AppResult<StoredRecord> {
        self.with_pool(|pool| {
            let matched = queries::mark_synced(&pool.conn, id, &synced_at)
                .map_err(|e| AppError::WriteFailed(e.to_string()))?;
            if matched == 0 {
                return Err(AppError::RecordNotFound(id));
            }

            let record =
                queries::load_record(&pool.conn, id)?.ok_or(AppError::RecordNotFound(id))?;
            debug!(id, synced_at = %format_instant(&synced_at), "record marked synced");
            Ok(record)
        })
        .await
    }

    pub async fn get(&self, id: i64) -> AppResult<StoredRecord> {
        self.with_pool(|pool| {
            queries::load_record(&pool.conn, id)?.ok_or(AppError::RecordNotFound(id))
        })
        .await
    }

    /// Snapshot of every pending record, oldest id first.
    pub async fn list_pending(&self) -> AppResult<Vec<StoredRecord>> {
        self.with_pool(|pool| queries::load_by_status(&pool.conn, SyncStatus::Pending))
            .await
    }

    pub async fn list_all(&self) -> AppResult<Vec<StoredRecord>> {
        self.with_pool(|pool| queries::load_all(&pool.conn)).await
    }

    /// Always counted from the rows themselves.
    pub async fn count_pending(&self) -> AppResult<usize> {
        self.with_pool(|pool| queries::count_by_status(&pool.conn, SyncStatus::Pending))
            .await
    }

    /// Append a line to the audit log.
    pub async fn audit(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.with_pool(|pool| ttlog(&pool.conn, operation, target, message))
            .await
    }

    pub async fn audit_log(&self) -> AppResult<Vec<LogEntry>> {
        self.with_pool(|pool| load_log(&pool.conn)).await
    }
}
