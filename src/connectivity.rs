//! Network status signal: current state plus offline→online transitions.

use tokio::sync::watch;
use tracing::info;

pub trait Connectivity: Send + Sync {
    fn is_online(&self) -> bool;

    /// Receiver notified on every status change (`true` = online).
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// Connectivity fed by whoever observes the network (the CLI flag, a probe,
/// a test). Cloning shares the same state.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    pub fn new(online: bool) -> Self {
        let (tx, _rx) = watch::channel(online);
        Self { tx }
    }

    /// Record the current status. Subscribers are only woken on an actual change.
    pub fn set_online(&self, online: bool) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            info!(online, "connectivity changed");
        }
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}
