//! Routine service error taxonomy.

use crate::cache::CacheError;
use crate::model::activity::ActivityKey;
use crate::remote::RemoteError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RoutineResult<T> = Result<T, RoutineError>;

/// Failure surfaced by routine use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineError {
    /// No routine has been loaded yet.
    NotLoaded,
    /// Display row id is not part of the current projection.
    StaleTask(usize),
    /// Display row refers to an activity no longer in the cache.
    StaleProjection(ActivityKey),
    /// Completion write failed remotely; the local flag was reverted.
    RemoteMutation(RemoteError),
    /// Initial fetch of the routine failed.
    Hydration(RemoteError),
    /// Create/update of the routine failed; the cache is unchanged.
    Regeneration(RemoteError),
    /// Another load or regeneration is still running.
    RegenerationInProgress,
}

impl Display for RoutineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "no routine loaded yet"),
            Self::StaleTask(task_id) => write!(f, "task {task_id} is no longer displayed"),
            Self::StaleProjection(key) => write!(
                f,
                "activity on {} ({}) is no longer in the routine",
                key.day,
                key.kind.as_str()
            ),
            Self::RemoteMutation(err) => write!(f, "could not save completion: {err}"),
            Self::Hydration(err) => write!(f, "could not load routine: {err}"),
            Self::Regeneration(err) => write!(f, "could not regenerate routine: {err}"),
            Self::RegenerationInProgress => write!(f, "routine update already in progress"),
        }
    }
}

impl Error for RoutineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RemoteMutation(err) | Self::Hydration(err) | Self::Regeneration(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CacheError> for RoutineError {
    fn from(value: CacheError) -> Self {
        match value {
            CacheError::Unloaded => Self::NotLoaded,
            CacheError::RecordNotFound(key) => Self::StaleProjection(key),
        }
    }
}
