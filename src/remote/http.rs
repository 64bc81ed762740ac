use super::Transport;
use super::protocol::{RemoteRequest, RemoteResponse};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use tracing::debug;

/// HTTP transport: parameters travel in the query string, the submitter's
/// uid as a bearer token, and the remote answers with a JSON envelope.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: &str) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("attendsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, request: &RemoteRequest) -> AppResult<RemoteResponse> {
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(&request.submitter.uid)
            .query(&request.query_pairs())
            .send()
            .await
            .map_err(|e| AppError::TransportFailure(format!("Network error: {}", e)))?;

        let status = response.status();
        debug!(status = status.as_u16(), request_id = %request.request_id, "remote answered");

        if status.is_client_error() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::RemoteRejected(format!("HTTP {}: {}", status, body)));
        }
        if !status.is_success() {
            return Err(AppError::TransportFailure(format!("HTTP {}", status)));
        }

        response
            .json::<RemoteResponse>()
            .await
            .map_err(|e| AppError::TransportFailure(format!("Parse error: {}", e)))
    }
}
