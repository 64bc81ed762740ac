use attendsync::core::history::{HistoryFilter, HistoryQuery, HistoryRow, run_query};
use attendsync::core::pending::pending_reminder;
use attendsync::models::{Action, BatchStatus, CaptureOutcome};
use chrono::Local;

mod common;
use common::{at, context, jane, record};

#[tokio::test]
async fn context_wires_identity_and_connectivity_from_config() {
    let (ctx, transport) = context(Some(jane()), false).await;
    assert!(ctx.is_online());
    assert!(ctx.is_signed_in());

    let outcome = ctx
        .orchestrator
        .capture(record("Jane", "Doe", Action::TimeIn, at(8, 0)))
        .await
        .unwrap();
    assert!(matches!(outcome, CaptureOutcome::Uploaded(_)));
    assert_eq!(transport.submit_count(), 1);
    assert_eq!(ctx.pending.count().await.unwrap(), 0);
}

#[tokio::test]
async fn offline_context_keeps_records_pending() {
    let (ctx, transport) = context(Some(jane()), true).await;

    ctx.orchestrator
        .capture(record("Jane", "Doe", Action::TimeIn, at(8, 0)))
        .await
        .unwrap();
    let report = ctx.orchestrator.run_batch_sync().await.unwrap();

    assert_eq!(report.status, BatchStatus::Offline);
    assert_eq!(transport.submit_count(), 0);

    let count = ctx.pending.count().await.unwrap();
    let reminder = pending_reminder(count, ctx.is_online(), ctx.is_signed_in()).unwrap();
    assert!(reminder.contains("back online"));
}

#[tokio::test]
async fn pending_history_lists_only_unsynced_rows() {
    let (ctx, _transport) = context(None, false).await;
    ctx.orchestrator
        .capture(record("Jane", "Doe", Action::TimeIn, at(8, 0)))
        .await
        .unwrap();

    let rows: Vec<HistoryRow> = ctx
        .store
        .list_all()
        .await
        .unwrap()
        .iter()
        .map(HistoryRow::from)
        .collect();
    let query = HistoryQuery {
        filter: HistoryFilter::Pending,
        ..HistoryQuery::default()
    };
    let page = run_query(rows, &query, false, Local::now());

    assert_eq!(page.total_rows, 1);
    assert_eq!(page.rows[0].label, "Time In");
}
