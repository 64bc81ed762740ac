use attendsync::errors::{AppError, FailureKind};
use attendsync::models::{Action, BatchReport, BatchStatus, CaptureOutcome, SyncStatus};
use attendsync::remote::scripted::{Reply, ScriptedTransport};
use attendsync::session::SessionHandle;
use std::time::Duration;

mod common;
use common::{Harness, at, jane, record};

#[tokio::test]
async fn batch_uploads_every_pending_record() {
    let h = Harness::new(true, true).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;
    h.seed("Bob", Action::TimeIn, at(8, 1)).await;
    h.seed("Cid", Action::TimeIn, at(8, 2)).await;

    let report = h.orchestrator.run_batch_sync().await.unwrap();

    assert_eq!(
        report,
        BatchReport {
            status: BatchStatus::Completed,
            succeeded: 3,
            failed: 0,
            skipped: 0,
        }
    );
    assert_eq!(h.store.count_pending().await.unwrap(), 0);
    let all = h.store.list_all().await.unwrap();
    assert!(all.iter().all(|r| r.sync_status == SyncStatus::Synced));
    assert!(all.iter().all(|r| r.synced_at.is_some()));

    // Submitted in store order.
    let order: Vec<_> = h
        .transport
        .received()
        .into_iter()
        .map(|p| p.first_name)
        .collect();
    assert_eq!(order, ["Ann", "Bob", "Cid"]);
}

#[tokio::test]
async fn offline_batch_makes_no_remote_call() {
    let h = Harness::new(false, true).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let report = h.orchestrator.run_batch_sync().await.unwrap();

    assert_eq!(report, BatchReport::gated(BatchStatus::Offline));
    assert_eq!(h.transport.submit_count(), 0);
    assert_eq!(h.store.count_pending().await.unwrap(), 1);
}

#[tokio::test]
async fn signed_out_batch_makes_no_remote_call() {
    let h = Harness::new(true, false).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let report = h.orchestrator.run_batch_sync().await.unwrap();

    assert_eq!(report, BatchReport::gated(BatchStatus::Unauthenticated));
    assert_eq!(h.transport.submit_count(), 0);
}

#[tokio::test]
async fn empty_queue_reports_nothing_pending() {
    let h = Harness::new(true, true).await;
    let report = h.orchestrator.run_batch_sync().await.unwrap();
    assert_eq!(report.status, BatchStatus::NothingPending);
    assert!(report.is_gated());
    assert_eq!(h.orchestrator.snapshot().runs, 1);
}

#[tokio::test]
async fn failed_record_stays_pending_and_batch_continues() {
    let h = Harness::new(true, true).await;
    let ok_id = h.seed("Ann", Action::TimeIn, at(8, 0)).await;
    let bad_id = h.seed("Bob", Action::TimeIn, at(8, 1)).await;
    h.transport
        .reply_for("Bob", Reply::Reject("Sheet locked".to_string()));

    let report = h.orchestrator.run_batch_sync().await.unwrap();

    assert_eq!(report.status, BatchStatus::Completed);
    assert_eq!((report.succeeded, report.failed), (1, 1));
    assert!(!h.store.get(ok_id).await.unwrap().is_pending());
    assert!(h.store.get(bad_id).await.unwrap().is_pending());

    // Next pass retries only what is still pending.
    h.transport.reply_for("Bob", Reply::Ack);
    let report = h.orchestrator.run_batch_sync().await.unwrap();
    assert_eq!((report.succeeded, report.failed), (1, 0));
    assert_eq!(h.transport.submit_count(), 3);
}

#[tokio::test]
async fn single_sync_reports_failure_kind_without_retrying() {
    let h = Harness::new(true, true).await;
    let id = h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    h.transport
        .reply_to_all_submissions(Reply::Reject("Duplicate".to_string()));
    let err = h.orchestrator.run_single_sync(id).await.unwrap_err();
    assert!(matches!(err, AppError::RemoteRejected(ref m) if m == "Duplicate"));
    assert_eq!(h.transport.submit_count(), 1);

    h.transport
        .reply_to_all_submissions(Reply::Drop("connection reset".to_string()));
    let err = h.orchestrator.run_single_sync(id).await.unwrap_err();
    assert_eq!(err.failure_kind(), FailureKind::Transport);
    assert_eq!(h.transport.submit_count(), 2);

    h.session.sign_out();
    let err = h.orchestrator.run_single_sync(id).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthenticated));
    assert_eq!(h.transport.submit_count(), 2);

    assert!(h.store.get(id).await.unwrap().is_pending());
}

#[tokio::test]
async fn single_sync_of_synced_record_does_not_resubmit() {
    let h = Harness::new(true, true).await;
    let id = h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let first = h.orchestrator.run_single_sync(id).await.unwrap();
    let again = h.orchestrator.run_single_sync(id).await.unwrap();

    assert_eq!(h.transport.submit_count(), 1);
    assert_eq!(first.synced_at, again.synced_at);
}

#[tokio::test]
async fn single_sync_offline_fails_without_contacting_remote() {
    let h = Harness::new(false, true).await;
    let id = h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let err = h.orchestrator.run_single_sync(id).await.unwrap_err();
    assert!(matches!(err, AppError::TransportFailure(_)));
    assert_eq!(h.transport.submit_count(), 0);
}

#[tokio::test]
async fn unknown_record_is_not_found() {
    let h = Harness::new(true, true).await;
    assert!(matches!(
        h.orchestrator.run_single_sync(99).await,
        Err(AppError::RecordNotFound(99))
    ));
}

#[tokio::test]
async fn capture_outcome_depends_on_state() {
    let h = Harness::new(true, true).await;
    let outcome = h
        .orchestrator
        .capture(record("Jane", "Doe", Action::TimeIn, at(8, 0)))
        .await
        .unwrap();
    assert!(matches!(outcome, CaptureOutcome::Uploaded(ref r) if !r.is_pending()));

    h.transport
        .reply_to_all_submissions(Reply::Reject("Quota exceeded".to_string()));
    let outcome = h
        .orchestrator
        .capture(record("Jane", "Doe", Action::LunchOut, at(12, 0)))
        .await
        .unwrap();
    assert_eq!(outcome.failure_kind(), Some(FailureKind::RemoteRejected));
    assert!(outcome.record().is_pending());

    h.session.sign_out();
    let outcome = h
        .orchestrator
        .capture(record("Jane", "Doe", Action::LunchIn, at(13, 0)))
        .await
        .unwrap();
    assert!(matches!(outcome, CaptureOutcome::AwaitingSignIn(_)));

    h.connectivity.set_online(false);
    let outcome = h
        .orchestrator
        .capture(record("Jane", "Doe", Action::TimeOut, at(17, 0)))
        .await
        .unwrap();
    assert!(matches!(outcome, CaptureOutcome::SavedOffline(_)));

    assert_eq!(h.store.count_pending().await.unwrap(), 3);
    assert_eq!(h.transport.submit_count(), 2);
}

#[tokio::test]
async fn capture_into_closed_store_is_an_error() {
    let h = Harness::new(true, true).await;
    h.store.close().await;
    let result = h
        .orchestrator
        .capture(record("Jane", "Doe", Action::TimeIn, at(8, 0)))
        .await;
    assert!(matches!(result, Err(AppError::StorageUnavailable)));
    assert_eq!(h.transport.submit_count(), 0);
}

#[tokio::test]
async fn offline_capture_uploads_when_connectivity_returns() {
    let h = Harness::new(false, true).await;

    let outcome = h
        .orchestrator
        .capture(record("Jane", "Doe", Action::TimeIn, at(8, 0)))
        .await
        .unwrap();
    assert!(matches!(outcome, CaptureOutcome::SavedOffline(_)));
    assert_eq!(h.store.count_pending().await.unwrap(), 1);

    let mut status = h.orchestrator.subscribe();
    let task = h.orchestrator.spawn_auto_sync(Duration::from_secs(300));
    h.connectivity.set_online(true);

    let snap = *tokio::time::timeout(Duration::from_secs(5), status.wait_for(|s| s.runs >= 1))
        .await
        .expect("auto sync did not run")
        .unwrap();
    task.abort();

    let report = snap.last_report.unwrap();
    assert_eq!((report.status, report.succeeded), (BatchStatus::Completed, 1));
    assert_eq!(h.store.count_pending().await.unwrap(), 0);
    assert_eq!(h.transport.received()[0].first_name, "Jane");
}

#[tokio::test(start_paused = true)]
async fn periodic_tick_runs_a_batch() {
    let h = Harness::new(true, true).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let mut status = h.orchestrator.subscribe();
    let task = h.orchestrator.spawn_auto_sync(Duration::from_secs(60));

    // Nothing happens before the first interval elapses.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(h.transport.submit_count(), 0);

    status.wait_for(|s| s.runs >= 1).await.unwrap();
    task.abort();
    assert_eq!(h.transport.submit_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_batches_share_one_run() {
    let session = SessionHandle::signed_in(jane());
    let transport = ScriptedTransport::new().with_delay(Duration::from_millis(200));
    let h = Harness::with_transport(transport, session, true, Duration::from_secs(20)).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;
    h.seed("Bob", Action::TimeIn, at(8, 1)).await;

    let (a, b) = tokio::join!(
        h.orchestrator.run_batch_sync(),
        h.orchestrator.run_batch_sync()
    );

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(a.succeeded, 2);
    assert_eq!(h.transport.submit_count(), 2);
    assert!(!h.orchestrator.is_syncing());
}

#[tokio::test]
async fn sign_out_during_batch_halts_remaining_records() {
    let session = SessionHandle::signed_in(jane());
    let hook_session = session.clone();
    let transport = ScriptedTransport::new().with_submit_hook(move |n, _| {
        if n == 1 {
            hook_session.sign_out();
        }
    });
    let h = Harness::with_transport(transport, session, true, Duration::from_secs(20)).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;
    h.seed("Bob", Action::TimeIn, at(8, 1)).await;
    h.seed("Cid", Action::TimeIn, at(8, 2)).await;

    let report = h.orchestrator.run_batch_sync().await.unwrap();

    assert_eq!(
        report,
        BatchReport {
            status: BatchStatus::Halted,
            succeeded: 1,
            failed: 0,
            skipped: 2,
        }
    );
    assert_eq!(h.transport.submit_count(), 1);
    assert_eq!(h.store.count_pending().await.unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn unanswered_submission_times_out_as_transport_failure() {
    let session = SessionHandle::signed_in(jane());
    let h = Harness::with_transport(ScriptedTransport::new(), session, true, Duration::from_secs(20))
        .await;
    h.transport.reply_to_all_submissions(Reply::Hang);
    let id = h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let err = h.orchestrator.run_single_sync(id).await.unwrap_err();

    assert_eq!(err.failure_kind(), FailureKind::Transport);
    assert!(h.store.get(id).await.unwrap().is_pending());
}

#[tokio::test]
async fn submission_carries_idempotency_key_and_label() {
    let h = Harness::new(true, true).await;
    let id = h.seed("Ann", Action::UniversityActivity, at(9, 30)).await;
    let stored = h.store.get(id).await.unwrap();

    h.orchestrator.run_single_sync(id).await.unwrap();

    let sent = &h.transport.received()[0];
    assert_eq!(sent.idempotency_key, stored.idempotency_key());
    assert_eq!(sent.action, "University Activity");
    assert_eq!(sent.last_name, "Doe");
}

#[tokio::test]
async fn audit_log_records_capture_and_sync() {
    let h = Harness::new(true, true).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;
    h.orchestrator.run_batch_sync().await.unwrap();

    let ops: Vec<String> = h
        .store
        .audit_log()
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.operation)
        .collect();
    assert!(ops.contains(&"capture".to_string()));
    assert!(ops.contains(&"sync".to_string()));
    assert!(ops.contains(&"sync_batch".to_string()));
}

#[tokio::test(start_paused = true)]
async fn cancelled_batch_returns_state_to_idle() {
    let h = Harness::new(true, true).await;
    h.transport.reply_to_all_submissions(Reply::Hang);
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let cancelled =
        tokio::time::timeout(Duration::from_secs(1), h.orchestrator.run_batch_sync()).await;
    assert!(cancelled.is_err());
    assert!(!h.orchestrator.is_syncing());
    assert_eq!(h.orchestrator.snapshot().runs, 0);

    // The upload lock was released too: the next batch runs normally.
    h.transport.reply_to_all_submissions(Reply::Ack);
    let report = h.orchestrator.run_batch_sync().await.unwrap();
    assert_eq!(report.succeeded, 1);
    assert!(!h.orchestrator.is_syncing());
}

#[tokio::test(start_paused = true)]
async fn record_added_mid_batch_waits_for_next_run() {
    let session = SessionHandle::signed_in(jane());
    let transport = ScriptedTransport::new().with_delay(Duration::from_millis(100));
    let h = Harness::with_transport(transport, session, true, Duration::from_secs(20)).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let (report, late_id) = tokio::join!(h.orchestrator.run_batch_sync(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        h.seed("Bob", Action::TimeIn, at(8, 1)).await
    });

    let report = report.unwrap();
    assert_eq!(report.status, BatchStatus::Completed);
    assert_eq!((report.succeeded, report.failed), (1, 0));
    assert!(h.store.get(late_id).await.unwrap().is_pending());
    assert_eq!(h.store.count_pending().await.unwrap(), 1);
    assert_eq!(h.transport.submit_count(), 1);

    let next = h.orchestrator.run_batch_sync().await.unwrap();
    assert_eq!(next.succeeded, 1);
    assert_eq!(h.transport.received()[1].first_name, "Bob");
}

#[tokio::test]
async fn sign_in_triggers_auto_sync() {
    let h = Harness::new(true, false).await;
    h.seed("Ann", Action::TimeIn, at(8, 0)).await;

    let mut status = h.orchestrator.subscribe();
    let task = h.orchestrator.spawn_auto_sync(Duration::from_secs(300));
    h.session.sign_in(jane());

    let snap = *tokio::time::timeout(Duration::from_secs(5), status.wait_for(|s| s.runs >= 1))
        .await
        .expect("auto sync did not run")
        .unwrap();
    task.abort();

    assert_eq!(snap.last_report.map(|r| r.succeeded), Some(1));
    assert_eq!(h.store.count_pending().await.unwrap(), 0);
}
