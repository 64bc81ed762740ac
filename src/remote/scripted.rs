//! In-memory remote used by tests and by `memory://` endpoints.
//!
//! Acknowledged submissions are kept as remote rows, so a later fetch returns
//! what was uploaded, like the real sheet would.

use super::Transport;
use super::protocol::{Operation, RemoteRequest, RemoteResponse, SubmitPayload};
use crate::errors::{AppError, AppResult};
use crate::models::record::RemoteRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How the fake remote answers one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ack,
    /// Remote answers with a failure status.
    Reject(String),
    /// Exchange never completes normally.
    Drop(String),
    /// No answer at all; only the channel timeout ends the wait.
    Hang,
}

type SubmitHook = Box<dyn Fn(u64, &SubmitPayload) + Send + Sync>;

#[derive(Default)]
struct ScriptState {
    by_first_name: HashMap<String, Reply>,
    default_submit: Option<Reply>,
    fetch_reply: Option<Reply>,
    received: Vec<SubmitPayload>,
    remote_rows: Vec<RemoteRecord>,
}

#[derive(Default)]
pub struct ScriptedTransport {
    state: Mutex<ScriptState>,
    hook: Option<SubmitHook>,
    delay: Option<Duration>,
    pub submit_calls: AtomicU64,
    pub fetch_calls: AtomicU64,
}

impl ScriptedTransport {
    /// A remote that acknowledges everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every exchange waits `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Called with the 1-based submission count before each submission is answered.
    pub fn with_submit_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(u64, &SubmitPayload) + Send + Sync + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Rows the remote already holds before any submission.
    pub fn with_remote_rows(self, rows: Vec<RemoteRecord>) -> Self {
        self.lock().remote_rows = rows;
        self
    }

    /// Answer submissions for this first name with `reply`.
    pub fn reply_for(&self, first_name: &str, reply: Reply) {
        self.lock()
            .by_first_name
            .insert(first_name.to_string(), reply);
    }

    pub fn reply_to_all_submissions(&self, reply: Reply) {
        self.lock().default_submit = Some(reply);
    }

    pub fn reply_to_fetch(&self, reply: Reply) {
        self.lock().fetch_reply = Some(reply);
    }

    pub fn set_remote_rows(&self, rows: Vec<RemoteRecord>) {
        self.lock().remote_rows = rows;
    }

    /// Every submission payload received, in arrival order.
    pub fn received(&self) -> Vec<SubmitPayload> {
        self.lock().received.clone()
    }

    pub fn remote_rows(&self) -> Vec<RemoteRecord> {
        self.lock().remote_rows.clone()
    }

    pub fn submit_count(&self) -> u64 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> u64 {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        // A poisoned script only means an earlier test thread panicked.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reply_for_submission(&self, payload: &SubmitPayload) -> Reply {
        let mut state = self.lock();
        state.received.push(payload.clone());
        state
            .by_first_name
            .get(&payload.first_name)
            .or(state.default_submit.as_ref())
            .cloned()
            .unwrap_or(Reply::Ack)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, request: &RemoteRequest) -> AppResult<RemoteResponse> {
        let reply = match &request.operation {
            Operation::Submit(payload) => {
                let n = self.submit_calls.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(hook) = &self.hook {
                    hook(n, payload);
                }
                self.reply_for_submission(payload)
            }
            Operation::Fetch => {
                self.fetch_calls.fetch_add(1, Ordering::SeqCst);
                self.lock().fetch_reply.clone().unwrap_or(Reply::Ack)
            }
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Reply::Ack => {
                let response = RemoteResponse::success(&request.request_id);
                match &request.operation {
                    Operation::Submit(payload) => {
                        self.lock().remote_rows.push(payload.to_remote_record());
                        Ok(response)
                    }
                    Operation::Fetch => Ok(response.with_records(self.remote_rows())),
                }
            }
            Reply::Reject(message) => Ok(RemoteResponse::failure(&request.request_id, &message)),
            Reply::Drop(message) => Err(AppError::TransportFailure(message)),
            Reply::Hang => std::future::pending().await,
        }
    }
}
