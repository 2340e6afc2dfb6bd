//! Routine screen session facade.
//!
//! # Responsibility
//! - Own the cache, cursor, off-day switch and notice queue of one screen.
//! - Expose the UI surface: display list, navigation, toggle, off-day
//!   switch, load/regenerate and completion analytics.
//!
//! # Invariants
//! - Lock order is cursor before cache; no lock is held across an await.
//! - Every user-visible failure queues exactly one notice.
//! - `revision()` never decreases while the session lives and the date
//!   provider does not go back in time.
//!
//! # See also
//! - `service::completion` for optimistic toggles.
//! - `service::regeneration` for the load-status state machine.

use crate::cache::SharedRoutineCache;
use crate::clock::{DateProvider, SystemDateProvider};
use crate::cursor::DayCursor;
use crate::model::weekday::Weekday;
use crate::projection::{project, DisplayedTask};
use crate::remote::{RegenerationMode, RoutineRemote};
use crate::service::analytics::{summarize, CompletionSummary};
use crate::service::completion::CompletionSynchronizer;
use crate::service::error::{RoutineError, RoutineResult};
use crate::service::lock;
use crate::service::regeneration::{LoadStatus, RegenerationController};
use chrono::Datelike;
use log::{info, warn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const MAX_PENDING_NOTICES: usize = 16;

/// Category of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A completion write failed and the checkbox flipped back.
    CompletionReverted,
    /// The tapped row no longer exists.
    StaleTask,
    /// Load or regeneration failed; the previous week stays displayed.
    RegenerationFailed,
}

impl NoticeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CompletionReverted => "completion_reverted",
            Self::StaleTask => "stale_task",
            Self::RegenerationFailed => "regeneration_failed",
        }
    }
}

/// Transient message for the UI, drained with `drain_notices`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// State and operations behind the weekly routine screen.
pub struct RoutineSession<C: DateProvider = SystemDateProvider> {
    cache: SharedRoutineCache,
    cursor: Mutex<DayCursor<C>>,
    synchronizer: CompletionSynchronizer,
    regeneration: RegenerationController,
    off_day: Mutex<bool>,
    notices: Mutex<VecDeque<Notice>>,
}

impl<C: DateProvider> RoutineSession<C> {
    /// Creates an unloaded session with the cursor on today.
    pub fn new(remote: Arc<dyn RoutineRemote>, user_id: u64, clock: C) -> Self {
        let cache = SharedRoutineCache::new();
        Self {
            synchronizer: CompletionSynchronizer::new(Arc::clone(&remote), cache.clone()),
            regeneration: RegenerationController::new(remote, cache.clone(), user_id),
            cursor: Mutex::new(DayCursor::new(clock)),
            off_day: Mutex::new(false),
            notices: Mutex::new(VecDeque::new()),
            cache,
        }
    }

    /// Handle to the shared cache.
    pub fn cache(&self) -> &SharedRoutineCache {
        &self.cache
    }

    /// Rows of the cursor day.
    ///
    /// # Errors
    /// - `NotLoaded` before any routine was cached.
    pub fn current_display_list(&self) -> RoutineResult<Vec<DisplayedTask>> {
        let cursor = lock(&self.cursor);
        Ok(self.cache.read(|cache| project(cache, &*cursor))?)
    }

    /// Moves the cursor; out-of-week targets are ignored.
    pub fn navigate(&self, delta: i64) -> bool {
        lock(&self.cursor).move_by(delta)
    }

    pub fn current_day(&self) -> Weekday {
        lock(&self.cursor).current_day_name()
    }

    pub fn current_day_label(&self) -> String {
        lock(&self.cursor).current_day_label()
    }

    pub fn current_date_label(&self) -> String {
        lock(&self.cursor).current_date_label()
    }

    /// Changes whenever the cache content, the cursor offset or the
    /// calendar date changes.
    pub fn revision(&self) -> u64 {
        let cursor_revision = lock(&self.cursor).revision();
        cursor_revision + self.cache.read(|cache| cache.revision())
    }

    pub fn load_status(&self) -> LoadStatus {
        self.regeneration.status()
    }

    pub fn off_day(&self) -> bool {
        *lock(&self.off_day)
    }

    /// Takes every queued notice, oldest first.
    pub fn drain_notices(&self) -> Vec<Notice> {
        lock(&self.notices).drain(..).collect()
    }

    /// Toggles completion of the row `task_id` of the current projection.
    ///
    /// Returns the new completion value once the server accepted it.
    pub async fn toggle_completion(&self, task_id: usize) -> RoutineResult<bool> {
        let task = self
            .current_display_list()?
            .into_iter()
            .find(|task| task.id == task_id);
        let Some(task) = task else {
            self.notify(NoticeKind::StaleTask, RoutineError::StaleTask(task_id).to_string());
            return Err(RoutineError::StaleTask(task_id));
        };

        let result = self.synchronizer.toggle(&task).await;
        match &result {
            Err(err @ RoutineError::RemoteMutation(_)) => {
                self.notify(NoticeKind::CompletionReverted, err.to_string());
            }
            Err(err @ RoutineError::StaleProjection(_)) => {
                self.notify(NoticeKind::StaleTask, err.to_string());
            }
            _ => {}
        }
        result
    }

    /// Flips the off-day switch for today and regenerates the week.
    ///
    /// The switch shows the requested value while the request runs and
    /// returns to its previous value when it fails.
    pub async fn set_off_day(&self, off_day: bool) -> RoutineResult<()> {
        let previous = std::mem::replace(&mut *lock(&self.off_day), off_day);
        let day = Weekday::from(lock(&self.cursor).today().weekday());
        info!(
            "event=off_day_switch module=service status=requested off_day={} day={}",
            off_day, day
        );

        let result = self
            .regenerate(RegenerationMode::Update { off_day, day })
            .await;
        if result.is_err() {
            *lock(&self.off_day) = previous;
        }
        result
    }

    /// Fetches the server week into the cache.
    pub async fn load(&self) -> RoutineResult<LoadStatus> {
        let result = self.regeneration.load().await;
        if let Err(err) = &result {
            self.notify(NoticeKind::RegenerationFailed, err.to_string());
        }
        result
    }

    /// Requests a new week and replaces the cache with it.
    pub async fn regenerate(&self, mode: RegenerationMode) -> RoutineResult<()> {
        let result = self.regeneration.regenerate(mode).await;
        if let Err(err) = &result {
            self.notify(NoticeKind::RegenerationFailed, err.to_string());
        }
        result
    }

    /// Completion rates of the cached week.
    pub fn completion_summary(&self) -> RoutineResult<CompletionSummary> {
        Ok(self.cache.read(|cache| cache.routine().map(summarize))?)
    }

    fn notify(&self, kind: NoticeKind, message: String) {
        warn!(
            "event=notice_queued module=service status=ok kind={}",
            kind.as_str()
        );
        let mut notices = lock(&self.notices);
        if notices.len() == MAX_PENDING_NOTICES {
            notices.pop_front();
        }
        notices.push_back(Notice { kind, message });
    }
}

#[cfg(test)]
mod tests {
    use super::{NoticeKind, RoutineSession};
    use crate::clock::FixedDateProvider;
    use crate::model::routine::WeeklyRoutine;
    use crate::remote::{
        CompletionUpdate, RegenerationMode, RemoteError, RemoteResult, RoutineRemote,
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Arc;

    struct OfflineRemote;

    #[async_trait]
    impl RoutineRemote for OfflineRemote {
        async fn fetch_routine(&self) -> RemoteResult<Option<WeeklyRoutine>> {
            Err(RemoteError::Timeout)
        }

        async fn regenerate_routine(
            &self,
            _user_id: u64,
            _mode: RegenerationMode,
        ) -> RemoteResult<WeeklyRoutine> {
            Err(RemoteError::Timeout)
        }

        async fn set_activity_completion(&self, _update: &CompletionUpdate) -> RemoteResult<()> {
            Err(RemoteError::Timeout)
        }
    }

    fn session() -> RoutineSession<FixedDateProvider> {
        let wednesday = NaiveDate::from_ymd_opt(2026, 10, 14).expect("valid date");
        RoutineSession::new(Arc::new(OfflineRemote), 1, FixedDateProvider(wednesday))
    }

    #[test]
    fn notice_kinds_have_stable_labels() {
        assert_eq!(NoticeKind::CompletionReverted.as_str(), "completion_reverted");
        assert_eq!(NoticeKind::StaleTask.as_str(), "stale_task");
        assert_eq!(NoticeKind::RegenerationFailed.as_str(), "regeneration_failed");
    }

    #[test]
    fn fresh_session_points_at_today_and_is_unloaded() {
        let session = session();
        assert_eq!(session.current_day_label(), "Today");
        assert_eq!(session.current_date_label(), "Oct 14 • Wednesday");
        assert!(session.current_display_list().is_err());
        assert!(session.completion_summary().is_err());
        assert_eq!(session.revision(), 0);
        assert!(session.drain_notices().is_empty());
    }

    #[test]
    fn notice_queue_is_bounded() {
        let session = session();
        for index in 0..40 {
            session.notify(NoticeKind::StaleTask, format!("notice {index}"));
        }
        let notices = session.drain_notices();
        assert_eq!(notices.len(), super::MAX_PENDING_NOTICES);
        assert_eq!(notices.last().map(|notice| notice.message.as_str()), Some("notice 39"));
        assert!(session.drain_notices().is_empty());
    }
}
