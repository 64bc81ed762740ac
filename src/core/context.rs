//! Wiring of store, session, connectivity, channel, orchestrator and view
//! from one loaded configuration.

use crate::config::Config;
use crate::connectivity::{Connectivity, ConnectivityMonitor};
use crate::core::pending::PendingCounter;
use crate::core::remote_view::RemoteView;
use crate::core::sync::SyncOrchestrator;
use crate::db::RecordStore;
use crate::errors::AppResult;
use crate::remote::http::HttpTransport;
use crate::remote::scripted::ScriptedTransport;
use crate::remote::{SubmissionChannel, Transport};
use crate::session::{SessionHandle, SessionProvider};
use std::sync::Arc;
use tracing::debug;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<RecordStore>,
    pub session: SessionHandle,
    pub connectivity: ConnectivityMonitor,
    pub orchestrator: Arc<SyncOrchestrator>,
    pub remote_view: RemoteView,
    pub pending: PendingCounter,
}

impl AppContext {
    /// Open the configured database and build every component on top of it.
    /// `offline` starts the connectivity monitor in the offline state.
    pub async fn build(config: Config, offline: bool) -> AppResult<Self> {
        let db_path = config.database_path();
        let store = Arc::new(RecordStore::open(&db_path.to_string_lossy()).await?);

        let transport: Arc<dyn Transport> = if config.uses_memory_remote() {
            debug!("using in-process remote");
            Arc::new(ScriptedTransport::new())
        } else {
            Arc::new(HttpTransport::new(&config.endpoint)?)
        };

        Ok(Self::assemble(config, store, transport, offline))
    }

    /// Build around an already opened store and a given transport.
    pub fn assemble(
        config: Config,
        store: Arc<RecordStore>,
        transport: Arc<dyn Transport>,
        offline: bool,
    ) -> Self {
        let session = SessionHandle::new(config.identity.clone());
        let connectivity = ConnectivityMonitor::new(!offline);

        let channel = Arc::new(
            SubmissionChannel::new(transport, Arc::new(session.clone()))
                .with_timeout(config.request_timeout()),
        );
        let orchestrator = Arc::new(SyncOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&channel),
            Arc::new(connectivity.clone()),
            Arc::new(session.clone()),
        ));
        let remote_view = RemoteView::new(channel, config.cache_ttl());
        let pending = PendingCounter::new(Arc::clone(&store));

        Self {
            config,
            store,
            session,
            connectivity,
            orchestrator,
            remote_view,
            pending,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.current_identity().is_some()
    }

    pub fn is_online(&self) -> bool {
        self.connectivity.is_online()
    }
}
