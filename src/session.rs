//! Identity seam. Sign-in itself happens elsewhere; this crate only needs to
//! know who is signed in right now and when that changes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// The authenticated submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

impl Identity {
    pub fn new(uid: &str, email: &str) -> Self {
        Self {
            uid: uid.to_string(),
            email: email.to_string(),
        }
    }
}

pub trait SessionProvider: Send + Sync {
    fn current_identity(&self) -> Option<Identity>;

    /// Receiver that observes every sign-in / sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}

/// Session state held in a watch channel. Cloning shares the same state.
#[derive(Clone)]
pub struct SessionHandle {
    tx: watch::Sender<Option<Identity>>,
}

impl SessionHandle {
    pub fn new(initial: Option<Identity>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn signed_in(identity: Identity) -> Self {
        Self::new(Some(identity))
    }

    pub fn sign_in(&self, identity: Identity) {
        self.tx.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }
}

impl SessionProvider for SessionHandle {
    fn current_identity(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}
