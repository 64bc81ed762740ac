//! Unified application error type.
//! Store, remote channel, orchestrator and CLI all return AppError so a
//! caller can tell "not saved at all" from "saved, upload failed".

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Local record store
    // ---------------------------
    #[error("Local storage is not available (store not opened)")]
    StorageUnavailable,

    #[error("Failed to write record: {0}")]
    WriteFailed(String),

    #[error("Record not found: {0}")]
    RecordNotFound(i64),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Remote channel
    // ---------------------------
    #[error("Not signed in: sign in to upload records")]
    Unauthenticated,

    #[error("Remote rejected the request: {0}")]
    RemoteRejected(String),

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    // ---------------------------
    // Config / IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

/// Coarse classification used when reporting a failed upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Storage,
    Unauthenticated,
    RemoteRejected,
    Transport,
    Other,
}

impl AppError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            AppError::StorageUnavailable
            | AppError::WriteFailed(_)
            | AppError::RecordNotFound(_)
            | AppError::Db(_)
            | AppError::Migration(_) => FailureKind::Storage,
            AppError::Unauthenticated => FailureKind::Unauthenticated,
            AppError::RemoteRejected(_) => FailureKind::RemoteRejected,
            AppError::TransportFailure(_) => FailureKind::Transport,
            _ => FailureKind::Other,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
