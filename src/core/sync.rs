//! Sync orchestrator: decides which records go to the remote, in what order,
//! and applies each acknowledgment back to the local store.

use crate::connectivity::Connectivity;
use crate::db::RecordStore;
use crate::errors::{AppError, AppResult};
use crate::models::record::{NewRecord, StoredRecord};
use crate::models::sync_report::{BatchReport, BatchStatus, CaptureOutcome};
use crate::remote::SubmissionChannel;
use crate::session::SessionProvider;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Observable orchestrator status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSnapshot {
    pub state: SyncState,
    /// Batches finished so far (gated ones included).
    pub runs: u64,
    pub last_report: Option<BatchReport>,
}

/// Marks the orchestrator as syncing for as long as it lives. Dropping it,
/// including when the batch future is cancelled, puts the state back to idle.
struct SyncingGuard<'a> {
    status: &'a watch::Sender<SyncSnapshot>,
}

impl<'a> SyncingGuard<'a> {
    fn enter(status: &'a watch::Sender<SyncSnapshot>) -> Self {
        status.send_modify(|s| s.state = SyncState::Syncing);
        Self { status }
    }
}

impl Drop for SyncingGuard<'_> {
    fn drop(&mut self) {
        self.status.send_if_modified(|s| {
            let was_syncing = s.state == SyncState::Syncing;
            s.state = SyncState::Idle;
            was_syncing
        });
    }
}

pub struct SyncOrchestrator {
    store: Arc<RecordStore>,
    channel: Arc<SubmissionChannel>,
    connectivity: Arc<dyn Connectivity>,
    session: Arc<dyn SessionProvider>,
    /// Held for the whole of a batch or single push; one upload at a time.
    upload_lock: Mutex<()>,
    status: watch::Sender<SyncSnapshot>,
}

impl SyncOrchestrator {
    pub fn new(
        store: Arc<RecordStore>,
        channel: Arc<SubmissionChannel>,
        connectivity: Arc<dyn Connectivity>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let (status, _rx) = watch::channel(SyncSnapshot {
            state: SyncState::Idle,
            runs: 0,
            last_report: None,
        });

        Self {
            store,
            channel,
            connectivity,
            session,
            upload_lock: Mutex::new(()),
            status,
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        *self.status.borrow()
    }

    pub fn state(&self) -> SyncState {
        self.snapshot().state
    }

    pub fn is_syncing(&self) -> bool {
        self.state() == SyncState::Syncing
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncSnapshot> {
        self.status.subscribe()
    }

    /// Persist a captured record, then push it right away when possible.
    ///
    /// Errors mean the record was not saved at all. Every `Ok` variant means
    /// it is safely stored, uploaded or not.
    pub async fn capture(&self, record: NewRecord) -> AppResult<CaptureOutcome> {
        let stored = self.store.append(record).await?;

        if !self.connectivity.is_online() {
            debug!(id = stored.id, "offline, record left pending");
            return Ok(CaptureOutcome::SavedOffline(stored));
        }
        if self.session.current_identity().is_none() {
            debug!(id = stored.id, "no session, record left pending");
            return Ok(CaptureOutcome::AwaitingSignIn(stored));
        }

        match self.run_single_sync(stored.id).await {
            Ok(synced) => Ok(CaptureOutcome::Uploaded(synced)),
            Err(error) => {
                warn!(id = stored.id, error = %error, "immediate upload failed");
                Ok(CaptureOutcome::UploadFailed {
                    record: stored,
                    error,
                })
            }
        }
    }

    /// Push one record once. No retry; on failure the record stays pending.
    pub async fn run_single_sync(&self, id: i64) -> AppResult<StoredRecord> {
        if !self.connectivity.is_online() {
            return Err(AppError::TransportFailure("device is offline".to_string()));
        }

        let _upload = self.upload_lock.lock().await;

        let record = self.store.get(id).await?;
        if !record.is_pending() {
            debug!(id, "already synced, nothing to push");
            return Ok(record);
        }

        self.push(&record).await
    }

    async fn push(&self, record: &StoredRecord) -> AppResult<StoredRecord> {
        self.channel.submit(record).await?;

        let synced = self.store.mark_synced(record.id, Utc::now()).await?;
        if let Err(e) = self
            .store
            .audit("sync", &record.id.to_string(), &record.idempotency_key())
            .await
        {
            warn!(id = record.id, error = %e, "audit write failed after sync");
        }
        Ok(synced)
    }

    /// Push every pending record, one after the other, in store order.
    ///
    /// Remote failures never escape: they are counted and the record stays
    /// pending. A call made while another batch is running waits for it and
    /// returns that batch's report instead of starting a second one.
    pub async fn run_batch_sync(&self) -> AppResult<BatchReport> {
        let before = self.snapshot();
        let joining = before.state == SyncState::Syncing;

        let _upload = self.upload_lock.lock().await;

        if joining {
            let now = self.snapshot();
            if now.runs > before.runs
                && let Some(report) = now.last_report
            {
                debug!("joined running batch");
                return Ok(report);
            }
        }

        let result = self.run_batch_locked().await;

        self.status.send_modify(|s| {
            s.state = SyncState::Idle;
            s.runs += 1;
            s.last_report = result.as_ref().ok().copied();
        });

        result
    }

    async fn run_batch_locked(&self) -> AppResult<BatchReport> {
        if !self.connectivity.is_online() {
            return Ok(BatchReport::gated(BatchStatus::Offline));
        }
        if self.session.current_identity().is_none() {
            return Ok(BatchReport::gated(BatchStatus::Unauthenticated));
        }

        let snapshot = self.store.list_pending().await?;
        if snapshot.is_empty() {
            return Ok(BatchReport::gated(BatchStatus::NothingPending));
        }

        let _syncing = SyncingGuard::enter(&self.status);
        info!(pending = snapshot.len(), "batch sync started");

        let mut report = BatchReport {
            status: BatchStatus::Completed,
            succeeded: 0,
            failed: 0,
            skipped: 0,
        };

        for (idx, record) in snapshot.iter().enumerate() {
            match self.push(record).await {
                Ok(_) => report.succeeded += 1,
                Err(AppError::Unauthenticated) => {
                    report.status = BatchStatus::Halted;
                    report.skipped = snapshot.len() - idx;
                    warn!(
                        remaining = report.skipped,
                        "session ended during batch, halting"
                    );
                    break;
                }
                Err(e) => {
                    warn!(id = record.id, error = %e, "record left pending");
                    report.failed += 1;
                }
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "batch sync finished"
        );
        let summary = format!(
            "succeeded={} failed={} skipped={}",
            report.succeeded, report.failed, report.skipped
        );
        if let Err(e) = self.store.audit("sync_batch", "", &summary).await {
            warn!(error = %e, "audit write failed after batch");
        }

        Ok(report)
    }

    /// Background task: run a batch on every offline→online transition, on
    /// every sign-in and every `interval`. Stops when the connectivity or
    /// session signal goes away; abort the handle to stop it earlier.
    pub fn spawn_auto_sync(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let this = Arc::clone(self);
        let mut online_rx = this.connectivity.subscribe();
        // Baseline taken before spawning so a transition that lands before
        // the task first runs is still seen as a change.
        let mut was_online = *online_rx.borrow_and_update();
        let mut session_rx = this.session.subscribe();
        let mut was_signed_in = session_rx.borrow_and_update().is_some();

        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    changed = online_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let online = *online_rx.borrow_and_update();
                        let came_online = online && !was_online;
                        was_online = online;
                        if !came_online {
                            continue;
                        }
                        info!("connectivity restored, syncing pending records");
                    }
                    changed = session_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let signed_in = session_rx.borrow_and_update().is_some();
                        let came_in = signed_in && !was_signed_in;
                        was_signed_in = signed_in;
                        if !came_in {
                            continue;
                        }
                        info!("signed in, syncing pending records");
                    }
                    _ = ticker.tick() => {
                        debug!("periodic sync tick");
                    }
                }

                match this.run_batch_sync().await {
                    Ok(report) if !report.is_gated() => {
                        info!(
                            succeeded = report.succeeded,
                            failed = report.failed,
                            "auto sync done"
                        );
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "auto sync could not read the store"),
                }
            }
        })
    }
}
