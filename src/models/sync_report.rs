use super::record::StoredRecord;
use crate::errors::{AppError, FailureKind};
use serde::Serialize;

/// Why a batch ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every record of the snapshot was attempted.
    Completed,
    /// Nothing was pending; no remote call made.
    NothingPending,
    /// Device offline; no remote call made.
    Offline,
    /// No session; no remote call made.
    Unauthenticated,
    /// Session ended mid-batch; remaining records were left untouched.
    Halted,
}

/// Aggregate outcome of one batch invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub status: BatchStatus,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchReport {
    pub fn gated(status: BatchStatus) -> Self {
        Self {
            status,
            succeeded: 0,
            failed: 0,
            skipped: 0,
        }
    }

    /// True when the gate short-circuited before any remote call.
    pub fn is_gated(&self) -> bool {
        matches!(
            self.status,
            BatchStatus::NothingPending | BatchStatus::Offline | BatchStatus::Unauthenticated
        )
    }
}

/// Result of capturing one record. Every variant means the record was saved
/// locally; a failed save is returned as an error instead.
#[derive(Debug)]
pub enum CaptureOutcome {
    Uploaded(StoredRecord),
    UploadFailed {
        record: StoredRecord,
        error: AppError,
    },
    SavedOffline(StoredRecord),
    AwaitingSignIn(StoredRecord),
}

impl CaptureOutcome {
    pub fn record(&self) -> &StoredRecord {
        match self {
            CaptureOutcome::Uploaded(r)
            | CaptureOutcome::SavedOffline(r)
            | CaptureOutcome::AwaitingSignIn(r) => r,
            CaptureOutcome::UploadFailed { record, .. } => record,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            CaptureOutcome::UploadFailed { error, .. } => Some(error.failure_kind()),
            _ => None,
        }
    }
}
