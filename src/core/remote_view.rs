use crate::core::view_cache::RemoteViewCache;
use crate::errors::AppResult;
use crate::models::record::RemoteRecord;
use crate::remote::SubmissionChannel;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

/// Read-through view of the remote record set.
///
/// Concurrent callers that miss the cache share one in-flight fetch: the
/// first takes the flight lock and fetches, the others wait on the lock and
/// then read what it stored.
pub struct RemoteView {
    channel: Arc<SubmissionChannel>,
    cache: Mutex<RemoteViewCache>,
    flight: AsyncMutex<()>,
}

impl RemoteView {
    pub fn new(channel: Arc<SubmissionChannel>, ttl: Duration) -> Self {
        Self {
            channel,
            cache: Mutex::new(RemoteViewCache::new(ttl)),
            flight: AsyncMutex::new(()),
        }
    }

    fn cache(&self) -> MutexGuard<'_, RemoteViewCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop the cached entry; the next read goes to the remote.
    pub fn invalidate(&self) {
        self.cache().invalidate();
    }

    pub async fn get_remote_view(&self, force_refresh: bool) -> AppResult<Vec<RemoteRecord>> {
        if force_refresh {
            self.invalidate();
        } else {
            let cached = self.cache().get();
            if let Some(records) = cached {
                debug!(rows = records.len(), "remote view served from cache");
                return Ok(records);
            }
        }

        let seen = self.cache().generation();
        let _flight = self.flight.lock().await;

        // Someone else fetched while we waited for the lock.
        let shared = {
            let cache = self.cache();
            if cache.generation() > seen {
                cache.get()
            } else {
                None
            }
        };
        if let Some(records) = shared {
            debug!(rows = records.len(), "remote view joined in-flight fetch");
            return Ok(records);
        }

        let ticket = self.cache().begin_fetch();
        let records = self.channel.fetch_all().await?;
        let stored = self.cache().complete_fetch(ticket, records.clone());
        info!(rows = records.len(), stored, "remote view fetched");
        Ok(records)
    }
}
