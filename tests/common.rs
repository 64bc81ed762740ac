#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use attendsync::config::Config;
use attendsync::connectivity::ConnectivityMonitor;
use attendsync::core::{AppContext, RemoteView, SyncOrchestrator};
use attendsync::db::RecordStore;
use attendsync::models::{Action, NewRecord};
use attendsync::remote::SubmissionChannel;
use attendsync::remote::scripted::ScriptedTransport;
use attendsync::session::{Identity, SessionHandle};
use chrono::{DateTime, TimeZone, Utc};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub fn ats(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("attendsync");
    cmd.env("HOME", home.path()).env_remove("ATTENDSYNC_LOG");
    cmd
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_attendsync.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    std::fs::remove_file(&db_path).ok();
    db_path
}

pub fn jane() -> Identity {
    Identity::new("uid-jane", "jane@example.org")
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, hour, minute, 0).unwrap()
}

pub fn record(first: &str, last: &str, action: Action, ts: DateTime<Utc>) -> NewRecord {
    NewRecord::new(first, last, action, ts).unwrap()
}

/// Everything a sync test needs, wired the way the binary wires it but
/// around an in-memory store and a scripted remote.
pub struct Harness {
    pub store: Arc<RecordStore>,
    pub transport: Arc<ScriptedTransport>,
    pub session: SessionHandle,
    pub connectivity: ConnectivityMonitor,
    pub orchestrator: Arc<SyncOrchestrator>,
    pub view: RemoteView,
}

impl Harness {
    pub async fn new(online: bool, signed_in: bool) -> Self {
        let session = SessionHandle::new(signed_in.then(jane));
        Self::with_transport(ScriptedTransport::new(), session, online, Duration::from_secs(20))
            .await
    }

    pub async fn with_transport(
        transport: ScriptedTransport,
        session: SessionHandle,
        online: bool,
        timeout: Duration,
    ) -> Self {
        let store = Arc::new(RecordStore::open_in_memory().await.unwrap());
        let transport = Arc::new(transport);
        let connectivity = ConnectivityMonitor::new(online);

        let channel = Arc::new(
            SubmissionChannel::new(transport.clone(), Arc::new(session.clone()))
                .with_timeout(timeout),
        );
        let orchestrator = Arc::new(SyncOrchestrator::new(
            store.clone(),
            channel.clone(),
            Arc::new(connectivity.clone()),
            Arc::new(session.clone()),
        ));
        let view = RemoteView::new(channel, Duration::from_secs(30));

        Self {
            store,
            transport,
            session,
            connectivity,
            orchestrator,
            view,
        }
    }

    /// Persist a record without trying to upload it.
    pub async fn seed(&self, first: &str, action: Action, ts: DateTime<Utc>) -> i64 {
        self.store
            .append(record(first, "Doe", action, ts))
            .await
            .unwrap()
            .id
    }
}

/// Context built through the same path as the binary, over a given store.
pub async fn context(identity: Option<Identity>, offline: bool) -> (AppContext, Arc<ScriptedTransport>) {
    let store = Arc::new(RecordStore::open_in_memory().await.unwrap());
    let transport = Arc::new(ScriptedTransport::new());
    let config = Config {
        identity,
        ..Config::default()
    };
    let ctx = AppContext::assemble(config, store, transport.clone(), offline);
    (ctx, transport)
}
