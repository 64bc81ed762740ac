use crate::db::RecordStore;
use crate::errors::AppResult;
use std::sync::Arc;

/// Live count of records not yet acknowledged by the remote. Recomputed
/// from the store on every call.
#[derive(Clone)]
pub struct PendingCounter {
    store: Arc<RecordStore>,
}

impl PendingCounter {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    pub async fn count(&self) -> AppResult<usize> {
        self.store.count_pending().await
    }
}

/// Reminder shown while records are waiting, worded for the current state.
pub fn pending_reminder(count: usize, online: bool, signed_in: bool) -> Option<String> {
    if count == 0 {
        return None;
    }
    let noun = if count == 1 { "record" } else { "records" };

    Some(match (online, signed_in) {
        (true, true) => format!(
            "You have {} pending {} waiting to sync. Run `sync` to upload them.",
            count, noun
        ),
        (true, false) => format!(
            "You have {} pending {} waiting to sync. Please sign in to upload to the server.",
            count, noun
        ),
        (false, _) => format!(
            "You have {} pending {}. They will upload when you are back online.",
            count, noun
        ),
    })
}
