mod common;

use common::{loaded_session, session, FakeRemote};
use flexiplan_core::{ActivityTime, ActivityType, CompletionRate, RoutineError, Weekday};

#[tokio::test]
async fn summary_requires_loaded_routine() {
    let remote = FakeRemote::new();
    let session = session(&remote);
    assert_eq!(session.completion_summary(), Err(RoutineError::NotLoaded));
}

#[tokio::test]
async fn summary_reflects_optimistic_toggles() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;
    session.toggle_completion(1).await.unwrap();

    let summary = session.completion_summary().unwrap();
    assert_eq!(summary.overall, CompletionRate { completed: 1, total: 3 });
    assert_eq!(
        summary.by_day[&Weekday::Wednesday],
        CompletionRate { completed: 1, total: 2 }
    );
    assert_eq!(summary.by_day[&Weekday::Sunday].total, 0);
    assert_eq!(summary.by_type[&ActivityType::Task].completed, 1);
    assert_eq!(summary.minutes_by_type[&ActivityType::Task], 135);
    assert_eq!(summary.minutes_by_type[&ActivityType::Hobby], 60);
}

#[tokio::test]
async fn summary_breaks_down_time_per_activity_and_day() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;
    session.toggle_completion(1).await.unwrap();

    let summary = session.completion_summary().unwrap();
    assert_eq!(
        summary.by_activity["Write report"],
        CompletionRate { completed: 1, total: 1 }
    );
    assert_eq!(summary.by_activity["Standup"].completed, 0);
    assert_eq!(summary.minutes_by_day[&Weekday::Monday], 15);
    assert_eq!(summary.minutes_by_day[&Weekday::Wednesday], 180);
    assert_eq!(summary.minutes_by_day[&Weekday::Friday], 0);
    assert_eq!(summary.minutes_by_activity["Morning Run"], 60);
    assert!((summary.average_daily_minutes - 195.0 / 7.0).abs() < 1e-9);
    assert_eq!(
        summary.most_frequent_activities,
        vec![
            ActivityTime { name: "Write report".to_string(), minutes: 120 },
            ActivityTime { name: "Morning Run".to_string(), minutes: 60 },
            ActivityTime { name: "Standup".to_string(), minutes: 15 },
        ]
    );
}

#[tokio::test]
async fn summary_reports_weekly_patterns() {
    let remote = FakeRemote::new();
    let session = loaded_session(&remote).await;

    let patterns = session.completion_summary().unwrap().patterns;
    assert_eq!(patterns.most_busy_day, Some(Weekday::Wednesday));
    assert_eq!(patterns.least_busy_day, Some(Weekday::Tuesday));
    assert_eq!(patterns.day_with_most_activities, Some(Weekday::Wednesday));
    assert_eq!(patterns.day_with_least_activities, Some(Weekday::Tuesday));
}
