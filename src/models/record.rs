use super::action::{Action, normalize_label};
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
}

impl SyncStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Synced => "synced",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SyncStatus::Pending),
            "synced" => Some(SyncStatus::Synced),
            _ => None,
        }
    }
}

/// Tuple handed over by the capture source. Not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub first_name: String,
    pub last_name: String,
    pub action: Action,
    pub action_label: String,
    pub timestamp: DateTime<Utc>,
}

impl NewRecord {
    /// Build a record with the canonical label for `action`.
    pub fn new(
        first_name: &str,
        last_name: &str,
        action: Action,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Self> {
        Self::with_label(first_name, last_name, action, action.label(), timestamp)
    }

    /// Build a record with an explicit label; the label must be the one `action` carries.
    pub fn with_label(
        first_name: &str,
        last_name: &str,
        action: Action,
        action_label: &str,
        timestamp: DateTime<Utc>,
    ) -> AppResult<Self> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() {
            return Err(AppError::InvalidName("first name is empty".into()));
        }
        if last_name.is_empty() {
            return Err(AppError::InvalidName("last name is empty".into()));
        }
        if !action.matches_label(action_label) {
            return Err(AppError::InvalidAction(format!(
                "label '{}' does not match action {}",
                action_label,
                action.code()
            )));
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            action,
            action_label: action_label.to_string(),
            // Stored with millisecond precision.
            timestamp: timestamp.trunc_subsecs(3),
        })
    }
}

/// A record as persisted in the local store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub timestamp: DateTime<Utc>,
    pub action: Action,
    pub action_label: String,
    pub sync_status: SyncStatus,
    pub created_at: DateTime<Utc>,
    pub synced_at: Option<DateTime<Utc>>,
}

impl StoredRecord {
    pub fn is_pending(&self) -> bool {
        self.sync_status == SyncStatus::Pending
    }

    /// Client-side de-duplication key sent along with every submission.
    pub fn idempotency_key(&self) -> String {
        format!("rec-{}-{}", self.id, self.timestamp.timestamp_millis())
    }

    pub fn timestamp_str(&self) -> String {
        format_instant(&self.timestamp)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An entry of the remote-authoritative record set. Has no local id and is
/// always considered synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRecord {
    pub first_name: String,
    pub last_name: String,
    pub timestamp: String,
    #[serde(alias = "action")]
    pub action_label: String,
}

impl RemoteRecord {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_instant(&self.timestamp).ok()
    }

    pub fn display_label(&self) -> String {
        normalize_label(&self.action_label)
    }
}

/// ISO-8601 with millisecond precision and `Z` suffix, the format records are stored in.
pub fn format_instant(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_instant(s: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::InvalidTimestamp(s.to_string()))
}
