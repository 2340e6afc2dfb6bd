#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use flexiplan_core::{
    ActivityRecord, ActivityType, CompletionUpdate, FixedDateProvider, RegenerationMode,
    RemoteError, RemoteResult, RoutineRemote, RoutineSession, Weekday, WeeklyRoutine,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub const USER_ID: u64 = 7;

/// One observed remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch,
    Regenerate { user_id: u64, mode: RegenerationMode },
    Completion(CompletionUpdate),
}

/// Scripted in-process remote.
///
/// Unscripted calls succeed: fetch returns no routine, completion writes are
/// accepted and regenerations fail with a transport error.
#[derive(Default)]
pub struct FakeRemote {
    fetches: Mutex<VecDeque<RemoteResult<Option<WeeklyRoutine>>>>,
    regenerations: Mutex<VecDeque<RemoteResult<WeeklyRoutine>>>,
    completions: Mutex<VecDeque<RemoteResult<()>>>,
    calls: Mutex<Vec<Call>>,
    gate: Mutex<Option<Arc<Notify>>>,
    entered: Notify,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_fetch(&self, result: RemoteResult<Option<WeeklyRoutine>>) {
        self.fetches.lock().unwrap().push_back(result);
    }

    pub fn push_regeneration(&self, result: RemoteResult<WeeklyRoutine>) {
        self.regenerations.lock().unwrap().push_back(result);
    }

    pub fn push_completion(&self, result: RemoteResult<()>) {
        self.completions.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn completion_calls(&self) -> Vec<CompletionUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Completion(update) => Some(update),
                _ => None,
            })
            .collect()
    }

    /// Holds the next call until the returned handle is notified.
    pub fn hold_next(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Resolves once a held call has been recorded.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    async fn observe(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
    }
}

#[async_trait]
impl RoutineRemote for FakeRemote {
    async fn fetch_routine(&self) -> RemoteResult<Option<WeeklyRoutine>> {
        self.observe(Call::Fetch).await;
        self.fetches.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    async fn regenerate_routine(
        &self,
        user_id: u64,
        mode: RegenerationMode,
    ) -> RemoteResult<WeeklyRoutine> {
        self.observe(Call::Regenerate { user_id, mode }).await;
        self.regenerations
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Transport("unscripted".to_string())))
    }

    async fn set_activity_completion(&self, update: &CompletionUpdate) -> RemoteResult<()> {
        self.observe(Call::Completion(update.clone())).await;
        self.completions.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// 2026-10-14, a Wednesday.
pub fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

pub fn record(name: &str, kind: ActivityType, start: &str, end: &str) -> ActivityRecord {
    ActivityRecord::new(name, kind, start, end)
}

/// Week with two Wednesday activities and one Monday activity.
pub fn sample_week() -> WeeklyRoutine {
    WeeklyRoutine::from_days([
        (
            Weekday::Monday,
            vec![record("Standup", ActivityType::Task, "09:00", "09:15")],
        ),
        (
            Weekday::Wednesday,
            vec![
                record("Morning Run", ActivityType::Hobby, "07:00", "08:00"),
                record("Write report", ActivityType::Task, "10:00", "12:00"),
            ],
        ),
    ])
}

/// Week produced by a regeneration; shares no activity with `sample_week`.
pub fn regenerated_week() -> WeeklyRoutine {
    WeeklyRoutine::from_days([(
        Weekday::Wednesday,
        vec![record("Rest", ActivityType::Other, "13:00", "14:00")],
    )])
}

pub fn session(remote: &Arc<FakeRemote>) -> RoutineSession<FixedDateProvider> {
    let remote: Arc<dyn RoutineRemote> = remote.clone();
    RoutineSession::new(remote, USER_ID, FixedDateProvider(wednesday()))
}

/// Session whose cache already holds `sample_week`.
pub async fn loaded_session(remote: &Arc<FakeRemote>) -> RoutineSession<FixedDateProvider> {
    let session = session(remote);
    remote.push_fetch(Ok(Some(sample_week())));
    session.load().await.unwrap();
    session
}
