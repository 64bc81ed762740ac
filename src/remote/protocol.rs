//! Request/response envelopes exchanged with the remote system of record.

use crate::models::record::{RemoteRecord, StoredRecord};
use crate::session::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status value the remote uses for an acknowledged request.
pub const STATUS_SUCCESS: &str = "success";

/// Identity fields of one record, as the remote expects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub timestamp: String,
    pub action: String,
    pub last_name: String,
    pub first_name: String,
    pub idempotency_key: String,
}

impl SubmitPayload {
    pub fn from_record(record: &StoredRecord) -> Self {
        Self {
            timestamp: record.timestamp_str(),
            action: record.action_label.clone(),
            last_name: record.last_name.clone(),
            first_name: record.first_name.clone(),
            idempotency_key: record.idempotency_key(),
        }
    }

    /// The entry the remote is expected to hold once this payload is acknowledged.
    pub fn to_remote_record(&self) -> RemoteRecord {
        RemoteRecord {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            timestamp: self.timestamp.clone(),
            action_label: self.action.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    Submit(SubmitPayload),
    Fetch,
}

/// Envelope for every outbound request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteRequest {
    /// Unique per exchange; echoed back by remotes that support it.
    pub request_id: String,
    pub issued_at: DateTime<Utc>,
    pub submitter: Identity,
    #[serde(flatten)]
    pub operation: Operation,
}

impl RemoteRequest {
    pub fn new(submitter: Identity, operation: Operation) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            issued_at: Utc::now(),
            submitter,
            operation,
        }
    }

    /// Flat key/value form for transports that carry parameters in the URL.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("requestId", self.request_id.clone())];
        match &self.operation {
            Operation::Submit(p) => {
                pairs.push(("timestamp", p.timestamp.clone()));
                pairs.push(("timekeeperEmail", self.submitter.email.clone()));
                pairs.push(("action", p.action.clone()));
                pairs.push(("lastName", p.last_name.clone()));
                pairs.push(("firstName", p.first_name.clone()));
                pairs.push(("idempotencyKey", p.idempotency_key.clone()));
            }
            Operation::Fetch => {
                pairs.push(("operation", "fetch".to_string()));
                pairs.push(("email", self.submitter.email.clone()));
            }
        }
        pairs
    }
}

/// Envelope for every response. Only `status == "success"` is an acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub records: Option<Vec<RemoteRecord>>,
}

impl RemoteResponse {
    pub fn success(request_id: &str) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            message: None,
            request_id: Some(request_id.to_string()),
            records: None,
        }
    }

    pub fn with_records(mut self, records: Vec<RemoteRecord>) -> Self {
        self.records = Some(records);
        self
    }

    pub fn failure(request_id: &str, message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message.to_string()),
            request_id: Some(request_id.to_string()),
            records: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}
