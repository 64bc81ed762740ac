//! Remote submission channel: one request, one response, bounded by a timeout.
//!
//! The channel owns identity checks, envelope construction and response
//! interpretation. A [`Transport`] only moves bytes.

pub mod http;
pub mod protocol;
pub mod scripted;

use crate::errors::{AppError, AppResult};
use crate::models::record::{RemoteRecord, StoredRecord};
use crate::session::{Identity, SessionProvider};
use async_trait::async_trait;
use protocol::{Operation, RemoteRequest, RemoteResponse, SubmitPayload};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Moves one request to the remote and brings back its response.
///
/// Failures to complete the exchange are reported as `TransportFailure`;
/// a transport may also return `RemoteRejected` when the remote refused the
/// request before producing a response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, request: &RemoteRequest) -> AppResult<RemoteResponse>;
}

pub struct SubmissionChannel {
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionProvider>,
    timeout: Duration,
}

impl SubmissionChannel {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            transport,
            session,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn identity(&self) -> AppResult<Identity> {
        self.session
            .current_identity()
            .ok_or(AppError::Unauthenticated)
    }

    /// Send one record and wait for the acknowledgment.
    ///
    /// Not idempotent at the remote: a retry after a timeout may record the
    /// event twice unless the remote honors the idempotency key.
    pub async fn submit(&self, record: &StoredRecord) -> AppResult<()> {
        let identity = self.identity()?;
        let request = RemoteRequest::new(
            identity,
            Operation::Submit(SubmitPayload::from_record(record)),
        );

        debug!(
            id = record.id,
            request_id = %request.request_id,
            "submitting record"
        );
        self.exchange(&request).await?;
        Ok(())
    }

    /// Fetch the organization-wide record set.
    pub async fn fetch_all(&self) -> AppResult<Vec<RemoteRecord>> {
        let identity = self.identity()?;
        let request = RemoteRequest::new(identity, Operation::Fetch);

        debug!(request_id = %request.request_id, "fetching remote records");
        let response = self.exchange(&request).await?;
        Ok(response.records.unwrap_or_default())
    }

    async fn exchange(&self, request: &RemoteRequest) -> AppResult<RemoteResponse> {
        let response = tokio::time::timeout(self.timeout, self.transport.exchange(request))
            .await
            .map_err(|_| {
                AppError::TransportFailure(format!(
                    "no response within {}s",
                    self.timeout.as_secs_f32()
                ))
            })??;

        if let Some(echoed) = &response.request_id
            && echoed != &request.request_id
        {
            warn!(
                expected = %request.request_id,
                got = %echoed,
                "response correlation mismatch"
            );
            return Err(AppError::TransportFailure(format!(
                "response belongs to request {}",
                echoed
            )));
        }

        if !response.is_success() {
            return Err(AppError::RemoteRejected(
                response
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
            ));
        }

        Ok(response)
    }
}
