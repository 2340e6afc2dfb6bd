//! Routine load and whole-week regeneration.
//!
//! # Responsibility
//! - Hydrate the cache from the server at session start.
//! - Request create/update regenerations and swap the returned week in.
//! - Own the explicit load-status state machine.
//!
//! # Invariants
//! - `Ready` is only reached through `Loading`.
//! - A failed call leaves the cache exactly as it was.
//! - Failure with a cached week returns to `Ready`; failure without one ends
//!   in `Failed(reason)`.
//! - At most one load/regeneration runs at a time.

use crate::cache::SharedRoutineCache;
use crate::model::routine::WeeklyRoutine;
use crate::remote::{RegenerationMode, RemoteError, RoutineRemote};
use crate::service::error::{RoutineError, RoutineResult};
use crate::service::lock;
use log::{info, warn};
use std::sync::{Arc, Mutex};

/// Screen-level routine availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing cached and nothing requested yet (or the server has none).
    Absent,
    /// A load or regeneration is running.
    Loading,
    /// A week is cached.
    Ready,
    /// The last attempt failed and nothing is cached.
    Failed(String),
}

impl LoadStatus {
    /// Stable label used in logs and FFI responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed(_) => "failed",
        }
    }
}

/// Fetches and replaces whole weeks in the shared cache.
pub struct RegenerationController {
    remote: Arc<dyn RoutineRemote>,
    cache: SharedRoutineCache,
    user_id: u64,
    status: Mutex<LoadStatus>,
}

impl RegenerationController {
    pub fn new(remote: Arc<dyn RoutineRemote>, cache: SharedRoutineCache, user_id: u64) -> Self {
        Self {
            remote,
            cache,
            user_id,
            status: Mutex::new(LoadStatus::Absent),
        }
    }

    pub fn status(&self) -> LoadStatus {
        lock(&self.status).clone()
    }

    /// Hydrates the cache with the server's current week.
    ///
    /// A server without a routine leaves the cache untouched.
    pub async fn load(&self) -> RoutineResult<LoadStatus> {
        self.begin("load")?;
        match self.remote.fetch_routine().await {
            Ok(Some(routine)) => Ok(self.settle_replace("load", routine)),
            Ok(None) => {
                let status = self.settle_unchanged();
                info!(
                    "event=routine_load module=service status=not_found load_status={}",
                    status.as_str()
                );
                Ok(status)
            }
            Err(err) => Err(self.settle_failure("load", err, RoutineError::Hydration)),
        }
    }

    /// Requests a whole new week and swaps it into the cache.
    pub async fn regenerate(&self, mode: RegenerationMode) -> RoutineResult<()> {
        self.begin(mode.as_str())?;
        match self.remote.regenerate_routine(self.user_id, mode).await {
            Ok(routine) => {
                self.settle_replace(mode.as_str(), routine);
                Ok(())
            }
            Err(err) => Err(self.settle_failure(mode.as_str(), err, RoutineError::Regeneration)),
        }
    }

    fn begin(&self, operation: &'static str) -> RoutineResult<()> {
        let mut status = lock(&self.status);
        if *status == LoadStatus::Loading {
            warn!(
                "event=routine_{} module=service status=rejected reason=in_progress",
                operation
            );
            return Err(RoutineError::RegenerationInProgress);
        }
        *status = LoadStatus::Loading;
        Ok(())
    }

    fn settle_replace(&self, operation: &'static str, routine: WeeklyRoutine) -> LoadStatus {
        let activities = routine.activity_count();
        self.cache.write(|cache| cache.replace(routine));
        *lock(&self.status) = LoadStatus::Ready;
        info!(
            "event=routine_{} module=service status=ok activities={}",
            operation, activities
        );
        LoadStatus::Ready
    }

    fn settle_unchanged(&self) -> LoadStatus {
        let status = if self.cache.read(|cache| cache.is_loaded()) {
            LoadStatus::Ready
        } else {
            LoadStatus::Absent
        };
        *lock(&self.status) = status.clone();
        status
    }

    fn settle_failure(
        &self,
        operation: &'static str,
        err: RemoteError,
        wrap: fn(RemoteError) -> RoutineError,
    ) -> RoutineError {
        let status = if self.cache.read(|cache| cache.is_loaded()) {
            LoadStatus::Ready
        } else {
            LoadStatus::Failed(err.to_string())
        };
        warn!(
            "event=routine_{} module=service status=error load_status={} error={}",
            operation,
            status.as_str(),
            err
        );
        *lock(&self.status) = status;
        wrap(err)
    }
}
