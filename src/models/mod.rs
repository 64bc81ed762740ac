pub mod action;
pub mod record;
pub mod sync_report;

pub use action::Action;
pub use record::{NewRecord, RemoteRecord, StoredRecord, SyncStatus};
pub use sync_report::{BatchReport, BatchStatus, CaptureOutcome};
