//! Short-lived cache of the last successful remote fetch.
//!
//! Entries are replaced wholesale. Each fetch takes a ticket before it starts;
//! its result is stored only if no newer result or invalidation happened in
//! the meantime, so a slow stale fetch cannot clobber a fresher one.

use crate::models::record::RemoteRecord;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug)]
struct CacheEntry {
    records: Vec<RemoteRecord>,
    fetched_at: Instant,
    ticket: FetchTicket,
}

#[derive(Debug)]
pub struct RemoteViewCache {
    ttl: Duration,
    entry: Option<CacheEntry>,
    next_ticket: u64,
    /// Tickets below this were issued before the last invalidation.
    floor: u64,
    writes: u64,
}

impl Default for RemoteViewCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl RemoteViewCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: None,
            next_ticket: 0,
            floor: 0,
            writes: 0,
        }
    }

    /// Cached records, only while younger than the TTL.
    pub fn get(&self) -> Option<Vec<RemoteRecord>> {
        self.entry
            .as_ref()
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.records.clone())
    }

    /// Store `records` as the newest entry.
    pub fn put(&mut self, records: Vec<RemoteRecord>) {
        let ticket = self.begin_fetch();
        self.complete_fetch(ticket, records);
    }

    /// Forget the entry and refuse results of fetches already in flight.
    pub fn invalidate(&mut self) {
        self.entry = None;
        self.floor = self.next_ticket;
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        ticket
    }

    /// Store the result of the fetch holding `ticket`. Returns false when the
    /// result was discarded as stale.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, records: Vec<RemoteRecord>) -> bool {
        if ticket.0 < self.floor {
            return false;
        }
        if let Some(current) = &self.entry
            && current.ticket >= ticket
        {
            return false;
        }

        self.entry = Some(CacheEntry {
            records,
            fetched_at: Instant::now(),
            ticket,
        });
        self.writes += 1;
        true
    }

    /// Number of entries stored so far.
    pub fn generation(&self) -> u64 {
        self.writes
    }
}
