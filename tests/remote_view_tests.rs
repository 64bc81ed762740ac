use attendsync::errors::AppError;
use attendsync::models::{Action, RemoteRecord};
use attendsync::remote::scripted::{Reply, ScriptedTransport};
use attendsync::session::SessionHandle;
use std::time::Duration;

mod common;
use common::{Harness, at, jane, record};

fn sheet_row(first: &str, label: &str) -> RemoteRecord {
    RemoteRecord {
        first_name: first.to_string(),
        last_name: "Doe".to_string(),
        timestamp: "2024-01-10T08:00:00.000Z".to_string(),
        action_label: label.to_string(),
    }
}

async fn harness_with_rows(rows: Vec<RemoteRecord>, delay: Option<Duration>) -> Harness {
    let mut transport = ScriptedTransport::new().with_remote_rows(rows);
    if let Some(d) = delay {
        transport = transport.with_delay(d);
    }
    Harness::with_transport(
        transport,
        SessionHandle::signed_in(jane()),
        true,
        Duration::from_secs(20),
    )
    .await
}

#[tokio::test(start_paused = true)]
async fn reads_within_ttl_share_one_fetch() {
    let h = harness_with_rows(vec![sheet_row("Ann", "Time In")], None).await;

    let first = h.view.get_remote_view(false).await.unwrap();
    tokio::time::advance(Duration::from_secs(10)).await;
    let second = h.view.get_remote_view(false).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(h.transport.fetch_count(), 1);

    tokio::time::advance(Duration::from_secs(21)).await;
    h.view.get_remote_view(false).await.unwrap();
    assert_eq!(h.transport.fetch_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn force_refresh_bypasses_cache() {
    let h = harness_with_rows(vec![sheet_row("Ann", "Time In")], None).await;
    h.view.get_remote_view(false).await.unwrap();

    h.transport
        .set_remote_rows(vec![sheet_row("Ann", "Time In"), sheet_row("Bob", "OUT")]);
    let cached = h.view.get_remote_view(false).await.unwrap();
    let fresh = h.view.get_remote_view(true).await.unwrap();

    assert_eq!(cached.len(), 1);
    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh[1].display_label(), "Time Out");
    assert_eq!(h.transport.fetch_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_misses_issue_one_fetch() {
    let h = harness_with_rows(
        vec![sheet_row("Ann", "Time In")],
        Some(Duration::from_millis(500)),
    )
    .await;

    let (a, b, c) = tokio::join!(
        h.view.get_remote_view(false),
        h.view.get_remote_view(false),
        h.view.get_remote_view(false)
    );

    assert_eq!(a.unwrap().len(), 1);
    assert_eq!(b.unwrap().len(), 1);
    assert_eq!(c.unwrap().len(), 1);
    assert_eq!(h.transport.fetch_count(), 1);
}

#[tokio::test]
async fn failed_fetch_is_reported_and_not_cached() {
    let h = harness_with_rows(vec![sheet_row("Ann", "Time In")], None).await;
    h.transport
        .reply_to_fetch(Reply::Reject("Access denied".to_string()));

    let err = h.view.get_remote_view(false).await.unwrap_err();
    assert!(matches!(err, AppError::RemoteRejected(_)));

    h.transport.reply_to_fetch(Reply::Ack);
    assert_eq!(h.view.get_remote_view(false).await.unwrap().len(), 1);
    assert_eq!(h.transport.fetch_count(), 2);
}

#[tokio::test]
async fn signed_out_fetch_is_unauthenticated() {
    let h = harness_with_rows(Vec::new(), None).await;
    h.session.sign_out();
    assert!(matches!(
        h.view.get_remote_view(true).await,
        Err(AppError::Unauthenticated)
    ));
    assert_eq!(h.transport.fetch_count(), 0);
}

#[tokio::test]
async fn uploaded_records_appear_after_invalidation() {
    let h = harness_with_rows(Vec::new(), None).await;
    assert!(h.view.get_remote_view(false).await.unwrap().is_empty());

    h.orchestrator
        .capture(record("Jane", "Doe", Action::LunchIn, at(13, 0)))
        .await
        .unwrap();
    h.view.invalidate();

    let rows = h.view.get_remote_view(false).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].first_name, "Jane");
    assert_eq!(rows[0].display_label(), "Lunch In");
}
