//! Integration tests for countdown
//!
//! These drive a whole session through `App`: protocol lines in, protocol
//! events out, with mock collaborators standing in for the terminal.

use countdown::{App, build_engine, open_engine};
use countdown_api::{Command, ErrorCode, EventPayload, TimerView, UpdateReason};
use countdown_config::Settings;
use countdown_host_api::{MockAlertPlayer, MockNotifier, NotificationKind};
use countdown_store::{MemoryStore, SqliteStore, Store};
use countdown_util::{ManualClock, SequentialIds, TimerId};
use std::sync::Arc;

struct Harness {
    app: App,
    notifier: MockNotifier,
    player: MockAlertPlayer,
}

fn make_app(store: Arc<dyn Store>, repeat_count: u32) -> Harness {
    let mut settings = Settings::default();
    settings.alerts.repeat_count = repeat_count;

    let mut engine = build_engine(
        store,
        &settings,
        Arc::new(SequentialIds::new("t")),
        Arc::new(ManualClock::new(1_700_000_000_000)),
    );
    engine.load();

    let notifier = MockNotifier::new();
    let player = MockAlertPlayer::new();
    let app = App::new(engine, Arc::new(notifier.clone()), Arc::new(player.clone()));
    Harness {
        app,
        notifier,
        player,
    }
}

async fn add(app: &mut App, title: &str, h: i64, m: i64, s: i64) -> TimerView {
    let payloads = app
        .handle_command(Command::Add {
            title: title.into(),
            description: String::new(),
            hours: h,
            minutes: m,
            seconds: s,
        })
        .await;
    match payloads.first() {
        Some(EventPayload::TimerAdded { timer }) => timer.clone(),
        other => panic!("Expected TimerAdded, got {:?}", other),
    }
}

fn expiries(payloads: &[EventPayload]) -> usize {
    payloads
        .iter()
        .filter(|p| matches!(p, EventPayload::TimerExpired { .. }))
        .count()
}

#[tokio::test]
async fn test_tea_timer_lifecycle() {
    let Harness {
        mut app,
        notifier,
        player,
    } = make_app(Arc::new(SqliteStore::in_memory().unwrap()), 0);

    let tea = add(&mut app, "Tea", 0, 5, 0).await;
    assert_eq!(tea.timer.duration, 300);
    assert_eq!(tea.timer.remaining_time, 300);
    assert!(!tea.timer.is_running);
    assert!(!app.needs_heartbeat());

    let id = tea.timer.id.clone();
    let payloads = app.handle_command(Command::Toggle { id: id.clone() }).await;
    assert!(matches!(
        payloads.as_slice(),
        [EventPayload::TimerUpdated {
            reason: UpdateReason::Toggled,
            ..
        }]
    ));
    assert!(app.needs_heartbeat());

    let mut expired = 0;
    for _ in 0..299 {
        expired += expiries(&app.heartbeat().await);
    }
    assert_eq!(expired, 0);
    assert_eq!(app.engine().get(&id).unwrap().remaining_time, 1);

    let last = app.heartbeat().await;
    assert_eq!(expiries(&last), 1);
    match &last[0] {
        EventPayload::TimerExpired { title, message, .. } => {
            assert_eq!(title, "Tea");
            assert_eq!(message, "Timer \"Tea\" has ended!");
        }
        other => panic!("Expected TimerExpired, got {:?}", other),
    }

    let timer = app.engine().get(&id).unwrap();
    assert_eq!(timer.remaining_time, 0);
    assert!(!timer.is_running);
    assert!(!app.needs_heartbeat());

    // More heartbeats never repeat the expiry
    for _ in 0..5 {
        assert_eq!(expiries(&app.heartbeat().await), 0);
    }

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Expiry);
    assert_eq!(sent[0].timer_id.as_ref(), Some(&id));
    assert_eq!(player.plays(), 1);

    let payloads = app.handle_command(Command::Restart { id: id.clone() }).await;
    match &payloads[0] {
        EventPayload::TimerUpdated { timer, reason } => {
            assert_eq!(*reason, UpdateReason::Restarted);
            assert_eq!(timer.timer.remaining_time, 300);
            assert!(!timer.timer.is_running);
        }
        other => panic!("Expected TimerUpdated, got {:?}", other),
    }
    assert!(!app.engine().is_ended(&id));
}

#[tokio::test]
async fn test_alert_repeats_then_stops() {
    let Harness {
        mut app, player, ..
    } = make_app(Arc::new(MemoryStore::new()), 3);

    let id = add(&mut app, "Eggs", 0, 0, 2).await.timer.id;
    app.handle_command(Command::Toggle { id: id.clone() }).await;

    app.heartbeat().await;
    assert_eq!(expiries(&app.heartbeat().await), 1);
    assert_eq!(player.plays(), 1);

    // Expiry is over but the alert keeps the heartbeat alive
    assert!(app.needs_heartbeat());
    for _ in 0..3 {
        app.heartbeat().await;
    }
    assert_eq!(player.plays(), 4);
    assert!(!app.needs_heartbeat());

    app.heartbeat().await;
    assert_eq!(player.plays(), 4);
}

#[tokio::test]
async fn test_dismiss_silences_alert() {
    let Harness {
        mut app,
        notifier,
        player,
    } = make_app(Arc::new(MemoryStore::new()), 5);

    let id = add(&mut app, "Pasta", 0, 0, 1).await.timer.id;
    app.handle_command(Command::Toggle { id: id.clone() }).await;
    assert_eq!(expiries(&app.heartbeat().await), 1);
    app.heartbeat().await;
    assert_eq!(player.plays(), 2);

    let payloads = app.handle_line(r#"{"type":"dismiss","id":"t-1"}"#).await;
    assert!(payloads.is_empty());
    assert_eq!(player.stops(), 1);
    assert!(!player.is_sounding());
    assert_eq!(notifier.withdrawn(), vec![id.clone()]);
    assert!(!app.needs_heartbeat());

    app.heartbeat().await;
    assert_eq!(player.plays(), 2);

    // A second dismiss has nothing left to cancel
    app.handle_command(Command::Dismiss { id }).await;
    assert_eq!(player.stops(), 1);
}

#[tokio::test]
async fn test_invalid_line_reports_error() {
    let Harness { mut app, .. } = make_app(Arc::new(MemoryStore::new()), 0);

    let payloads = app.handle_line("toggle everything").await;
    match payloads.as_slice() {
        [EventPayload::Error(info)] => assert_eq!(info.code, ErrorCode::InvalidCommand),
        other => panic!("Expected one error, got {:?}", other),
    }

    let payloads = app.handle_line(r#"{"type":"ping"}"#).await;
    assert!(matches!(payloads.as_slice(), [EventPayload::Pong]));
}

#[tokio::test]
async fn test_validation_failures_are_reported() {
    let Harness { mut app, .. } = make_app(Arc::new(MemoryStore::new()), 0);

    let payloads = app
        .handle_line(r#"{"type":"add","title":"   ","minutes":5}"#)
        .await;
    assert!(matches!(
        payloads.as_slice(),
        [EventPayload::ValidationFailed { .. }]
    ));

    let payloads = app.handle_line(r#"{"type":"add","minutes":5}"#).await;
    match payloads.as_slice() {
        [EventPayload::ValidationFailed { message }] => assert_eq!(message, "Title is required"),
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }

    let payloads = app
        .handle_line(r#"{"type":"add","title":"Nap","hours":25}"#)
        .await;
    assert!(matches!(
        payloads.as_slice(),
        [EventPayload::ValidationFailed { .. }]
    ));
    assert!(app.engine().timers().is_empty());

    let id = add(&mut app, "Nap", 0, 20, 0).await.timer.id;
    let payloads = app
        .handle_command(Command::Edit {
            id: id.clone(),
            title: None,
            description: None,
            hours: None,
            minutes: Some(0),
            seconds: Some(0),
        })
        .await;
    assert!(matches!(
        payloads.as_slice(),
        [EventPayload::ValidationFailed { .. }]
    ));
    assert_eq!(app.engine().get(&id).unwrap().duration, 1200);
}

#[tokio::test]
async fn test_edit_keeps_unspecified_fields() {
    let Harness { mut app, .. } = make_app(Arc::new(MemoryStore::new()), 0);

    let id = add(&mut app, "Laundry", 1, 0, 0).await.timer.id;
    let payloads = app
        .handle_line(r#"{"type":"edit","id":"t-1","title":"Dryer","minutes":30}"#)
        .await;
    match payloads.as_slice() {
        [EventPayload::TimerUpdated { timer, reason }] => {
            assert_eq!(*reason, UpdateReason::Edited);
            assert_eq!(timer.timer.title, "Dryer");
            assert_eq!(timer.timer.duration, 5400);
            assert_eq!(timer.timer.remaining_time, 5400);
        }
        other => panic!("Expected TimerUpdated, got {:?}", other),
    }

    // Unknown ids are ignored
    let payloads = app
        .handle_command(Command::Edit {
            id: TimerId::new("missing"),
            title: Some("x".into()),
            description: None,
            hours: None,
            minutes: None,
            seconds: None,
        })
        .await;
    assert!(payloads.is_empty());
    assert_eq!(app.engine().get(&id).unwrap().title, "Dryer");
}

#[tokio::test]
async fn test_corrupt_slot_loads_empty() {
    let store = MemoryStore::new();
    store.seed("timers", "{not json");
    let Harness { app, .. } = make_app(Arc::new(store.clone()), 0);
    assert!(app.engine().timers().is_empty());

    let store = MemoryStore::new();
    store.seed(
        "timers",
        r#"[{"id":"a","title":"Bad","description":"","duration":10,"remainingTime":20,"isRunning":false,"createdAt":0}]"#,
    );
    let Harness { app, .. } = make_app(Arc::new(store), 0);
    assert!(app.engine().timers().is_empty());
}

#[tokio::test]
async fn test_saved_running_timer_is_kept_verbatim() {
    let store = MemoryStore::new();
    store.seed(
        "timers",
        r#"[{"id":"a","title":"Bread","description":"","duration":600,"remainingTime":120,"isRunning":true,"createdAt":5}]"#,
    );
    let Harness { mut app, .. } = make_app(Arc::new(store), 0);

    let id = TimerId::new("a");
    let timer = app.engine().get(&id).unwrap();
    assert_eq!(timer.remaining_time, 120);
    assert!(timer.is_running);
    assert!(app.needs_heartbeat());

    app.heartbeat().await;
    assert_eq!(app.engine().get(&id).unwrap().remaining_time, 119);
}

#[tokio::test]
async fn test_storage_failure_is_reported_and_change_stands() {
    let store = MemoryStore::new();
    let Harness {
        mut app, notifier, ..
    } = make_app(Arc::new(store.clone()), 0);

    store.set_fail_writes(true);
    let payloads = app
        .handle_command(Command::Add {
            title: "Tea".into(),
            description: String::new(),
            hours: 0,
            minutes: 3,
            seconds: 0,
        })
        .await;

    assert!(
        payloads
            .iter()
            .any(|p| matches!(p, EventPayload::TimerAdded { .. }))
    );
    assert!(
        payloads
            .iter()
            .any(|p| matches!(p, EventPayload::StorageWarning { .. }))
    );
    assert_eq!(app.engine().timers().len(), 1);
    assert!(store.raw("timers").is_none());

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, NotificationKind::Warning);
}

#[tokio::test]
async fn test_countdown_progress_is_not_saved() {
    let store = MemoryStore::new();
    let Harness { mut app, .. } = make_app(Arc::new(store.clone()), 0);

    let id = add(&mut app, "Tea", 0, 5, 0).await.timer.id;
    app.handle_command(Command::Toggle { id: id.clone() }).await;
    for _ in 0..10 {
        app.heartbeat().await;
    }
    assert_eq!(app.engine().get(&id).unwrap().remaining_time, 290);

    let Harness { app, .. } = make_app(Arc::new(store), 0);
    let timer = app.engine().get(&id).unwrap();
    assert_eq!(timer.remaining_time, 300);
    assert!(!timer.is_running);
}

#[tokio::test]
async fn test_timers_survive_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::default().with_data_dir(dir.path().to_path_buf());

    let mut app = App::new(
        open_engine(&settings).unwrap(),
        Arc::new(MockNotifier::new()),
        Arc::new(MockAlertPlayer::new()),
    );
    let tea = add(&mut app, "Tea", 0, 5, 0).await;
    let eggs = add(&mut app, "Eggs", 0, 7, 0).await;
    app.handle_command(Command::Delete {
        id: eggs.timer.id.clone(),
    })
    .await;
    drop(app);

    let engine = open_engine(&settings).unwrap();
    let timers = engine.timers();
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].id, tea.timer.id);
    assert_eq!(timers[0].title, "Tea");
    assert_eq!(timers[0].duration, 300);
}

#[tokio::test]
async fn test_list_snapshots_all_timers() {
    let Harness { mut app, .. } = make_app(Arc::new(MemoryStore::new()), 0);

    add(&mut app, "One", 0, 1, 0).await;
    add(&mut app, "Two", 0, 2, 0).await;

    let payloads = app.handle_line(r#"{"type":"list"}"#).await;
    match payloads.as_slice() {
        [EventPayload::Timers { timers }] => {
            let titles: Vec<_> = timers.iter().map(|t| t.timer.title.as_str()).collect();
            assert_eq!(titles, vec!["One", "Two"]);
            assert_eq!(timers[1].remaining_display, "02:00");
        }
        other => panic!("Expected Timers, got {:?}", other),
    }
}
