//! Formatting utilities used for CLI output.

use crate::models::sync_report::{BatchReport, BatchStatus};

/// One-line human summary of a batch run.
pub fn describe_batch(report: &BatchReport) -> String {
    match report.status {
        BatchStatus::Offline => "Device is offline; nothing was uploaded.".to_string(),
        BatchStatus::Unauthenticated => "Not signed in; nothing was uploaded.".to_string(),
        BatchStatus::NothingPending => "No pending records to sync.".to_string(),
        BatchStatus::Completed => format!(
            "Synced {} record(s), {} failed.",
            report.succeeded, report.failed
        ),
        BatchStatus::Halted => format!(
            "Session ended: synced {}, failed {}, {} left for later.",
            report.succeeded, report.failed, report.skipped
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halted_batch_mentions_skipped() {
        let report = BatchReport {
            status: BatchStatus::Halted,
            succeeded: 1,
            failed: 0,
            skipped: 2,
        };
        assert!(describe_batch(&report).contains("2 left"));
        assert_eq!(
            describe_batch(&BatchReport::gated(BatchStatus::NothingPending)),
            "No pending records to sync."
        );
    }
}
