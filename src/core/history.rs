//! History listing over local or remote records: filter, search, sort, page.

use crate::errors::{AppError, AppResult};
use crate::models::record::{RemoteRecord, StoredRecord, SyncStatus};
use crate::utils::date;
use chrono::{DateTime, Local, Utc};
use std::str::FromStr;

pub const DEFAULT_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    Pending,
    Synced,
    Today,
    Week,
}

impl FromStr for HistoryFilter {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(HistoryFilter::All),
            "pending" => Ok(HistoryFilter::Pending),
            "synced" => Ok(HistoryFilter::Synced),
            "today" => Ok(HistoryFilter::Today),
            "week" => Ok(HistoryFilter::Week),
            other => Err(AppError::InvalidFilter(other.to_string())),
        }
    }
}

/// One displayable line, from either source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub raw_timestamp: String,
    pub label: String,
    pub status: SyncStatus,
    pub synced_at: Option<DateTime<Utc>>,
}

impl From<&StoredRecord> for HistoryRow {
    fn from(r: &StoredRecord) -> Self {
        Self {
            id: Some(r.id),
            first_name: r.first_name.clone(),
            last_name: r.last_name.clone(),
            timestamp: Some(r.timestamp),
            raw_timestamp: r.timestamp_str(),
            label: r.action_label.clone(),
            status: r.sync_status,
            synced_at: r.synced_at,
        }
    }
}

impl From<&RemoteRecord> for HistoryRow {
    fn from(r: &RemoteRecord) -> Self {
        Self {
            id: None,
            first_name: r.first_name.clone(),
            last_name: r.last_name.clone(),
            timestamp: r.parsed_timestamp(),
            raw_timestamp: r.timestamp.clone(),
            label: r.display_label(),
            status: SyncStatus::Synced,
            synced_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryQuery {
    pub filter: HistoryFilter,
    pub search: Option<String>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            filter: HistoryFilter::All,
            search: None,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub rows: Vec<HistoryRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
}

/// Apply `query` to `rows`. Status filters only apply to local rows; remote
/// rows are always synced.
pub fn run_query(
    rows: Vec<HistoryRow>,
    query: &HistoryQuery,
    remote: bool,
    now: DateTime<Local>,
) -> HistoryPage {
    let since = match query.filter {
        HistoryFilter::Today => Some(date::start_of_day(now)),
        HistoryFilter::Week => Some(date::start_of_week(now)),
        _ => None,
    };
    let needle = query
        .search
        .as_ref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());

    let mut filtered: Vec<HistoryRow> = rows
        .into_iter()
        .filter(|row| match (remote, query.filter) {
            (false, HistoryFilter::Pending) => row.status == SyncStatus::Pending,
            (false, HistoryFilter::Synced) => row.status == SyncStatus::Synced,
            _ => true,
        })
        .filter(|row| match since {
            Some(since) => row.timestamp.is_some_and(|ts| ts >= since),
            None => true,
        })
        .filter(|row| match &needle {
            Some(n) => {
                row.first_name.to_lowercase().contains(n)
                    || row.last_name.to_lowercase().contains(n)
                    || row.label.to_lowercase().contains(n)
            }
            None => true,
        })
        .collect();

    // Newest first; rows without a readable timestamp go last.
    filtered.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let per_page = query.per_page.max(1);
    let total_rows = filtered.len();
    let total_pages = total_rows.div_ceil(per_page).max(1);
    let page = query.page.clamp(1, total_pages);

    let rows = filtered
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    HistoryPage {
        rows,
        page,
        total_pages,
        total_rows,
    }
}
