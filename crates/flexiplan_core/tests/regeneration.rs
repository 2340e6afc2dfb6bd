mod common;

use common::{loaded_session, regenerated_week, sample_week, session, Call, FakeRemote, USER_ID};
use flexiplan_core::{
    LoadStatus, NoticeKind, RegenerationMode, RemoteError, RoutineError, Weekday,
};

#[tokio::test]
async fn load_moves_from_absent_through_loading_to_ready() {
    let remote = FakeRemote::new();
    let session = session(&remote);
    assert_eq!(session.load_status(), LoadStatus::Absent);

    remote.push_fetch(Ok(Some(sample_week())));
    let gate = remote.hold_next();
    let (status, ()) = tokio::join!(session.load(), async {
        remote.wait_entered().await;
        assert_eq!(session.load_status(), LoadStatus::Loading);
        gate.notify_one();
    });

    assert_eq!(status.unwrap(), LoadStatus::Ready);
    assert_eq!(session.load_status(), LoadStatus::Ready);
    assert_eq!(session.current_display_list().unwrap().len(), 2);
}

#[tokio::test]
async fn load_without_server_routine_stays_absent() {
    let remote = FakeRemote::new();
    let session = session(&remote);

    assert_eq!(session.load().await.unwrap(), LoadStatus::Absent);
    assert_eq!(session.current_display_list(), Err(RoutineError::NotLoaded));
}

#[tokio::test]
async fn failed_first_load_reports_failure_reason() {
    let remote = FakeRemote::new();
    let session = session(&remote);
    remote.push_fetch(Err(RemoteError::Timeout));

    let err = session.load().await.unwrap_err();
    assert_eq!(err, RoutineError::Hydration(RemoteError::Timeout));
    assert!(matches!(session.load_status(), LoadStatus::Failed(_)));
    assert_eq!(session.drain_notices()[0].kind, NoticeKind::RegenerationFailed);
}

#[tokio::test]
async fn regeneration_replaces_whole_week() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;
    remote.push_regeneration(Ok(regenerated_week()));

    session.regenerate(RegenerationMode::Create).await.unwrap();

    let rows = session.current_display_list().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Rest");
    // Monday had an activity before; replace never merges it back.
    assert!(session.navigate(-2));
    assert!(session.current_display_list().unwrap().is_empty());
    assert_eq!(
        remote.calls().last(),
        Some(&Call::Regenerate {
            user_id: USER_ID,
            mode: RegenerationMode::Create
        })
    );
}

#[tokio::test]
async fn failed_regeneration_keeps_cache_intact() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;
    session.toggle_completion(0).await.unwrap();
    let before = session.cache().snapshot();
    remote.push_regeneration(Err(RemoteError::Status {
        code: 503,
        message: "generator offline".to_string(),
    }));

    let err = session.regenerate(RegenerationMode::Create).await.unwrap_err();
    assert!(matches!(err, RoutineError::Regeneration(_)));
    assert_eq!(session.cache().snapshot(), before);
    assert_eq!(session.load_status(), LoadStatus::Ready);
    assert_eq!(session.drain_notices()[0].kind, NoticeKind::RegenerationFailed);
}

#[tokio::test]
async fn off_day_switch_requests_update_for_today() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;
    remote.push_regeneration(Ok(regenerated_week()));

    session.set_off_day(true).await.unwrap();
    assert!(session.off_day());
    assert_eq!(
        remote.calls().last(),
        Some(&Call::Regenerate {
            user_id: USER_ID,
            mode: RegenerationMode::Update {
                off_day: true,
                day: Weekday::Wednesday
            }
        })
    );
}

#[tokio::test]
async fn failed_off_day_switch_reverts_control() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;
    let before = session.cache().snapshot();
    remote.push_regeneration(Err(RemoteError::Timeout));
    let gate = remote.hold_next();

    let (result, ()) = tokio::join!(session.set_off_day(true), async {
        remote.wait_entered().await;
        assert!(session.off_day());
        gate.notify_one();
    });

    assert!(matches!(result, Err(RoutineError::Regeneration(_))));
    assert!(!session.off_day());
    assert_eq!(session.cache().snapshot(), before);
    assert_eq!(session.drain_notices().len(), 1);
}

#[tokio::test]
async fn concurrent_regeneration_is_rejected() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;
    remote.push_regeneration(Ok(regenerated_week()));
    let gate = remote.hold_next();

    let (first, second) = tokio::join!(session.regenerate(RegenerationMode::Create), async {
        remote.wait_entered().await;
        let second = session.load().await;
        gate.notify_one();
        second
    });

    assert_eq!(second, Err(RoutineError::RegenerationInProgress));
    first.unwrap();
    assert_eq!(session.load_status(), LoadStatus::Ready);
    assert_eq!(session.current_display_list().unwrap()[0].name, "Rest");
}

#[tokio::test]
async fn revision_advances_on_cache_and_cursor_changes() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;
    let loaded = session.revision();

    session.toggle_completion(0).await.unwrap();
    let toggled = session.revision();
    assert!(toggled > loaded);

    assert!(session.navigate(1));
    assert!(session.revision() > toggled);

    let unchanged = session.revision();
    assert!(!session.navigate(10));
    assert_eq!(session.revision(), unchanged);
}
