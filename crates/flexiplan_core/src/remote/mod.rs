//! Remote routine service contracts.
//!
//! # Responsibility
//! - Define the three remote operations the routine core depends on.
//! - Classify transport and protocol failures into one error type.
//!
//! # Invariants
//! - Implementations never retry; one call is at most one request.
//! - Week payloads are validated into `WeeklyRoutine` before being returned,
//!   so callers only ever see complete weeks.

pub mod http;
pub mod wire;

use crate::model::activity::ActivityType;
use crate::model::routine::WeeklyRoutine;
use crate::model::weekday::Weekday;
use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use http::HttpRoutineRemote;
pub use wire::PayloadError;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote call failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// The server has no routine for this user.
    NotFound,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// Connection-level failure before a response was received.
    Transport(String),
    /// Non-success HTTP status.
    Status { code: u16, message: String },
    /// Response body could not be decoded or validated.
    Decode(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "no routine found on server"),
            Self::Timeout => write!(f, "request timed out"),
            Self::Transport(message) => write!(f, "network error: {message}"),
            Self::Status { code, message } => write!(f, "server returned {code}: {message}"),
            Self::Decode(message) => write!(f, "invalid server response: {message}"),
        }
    }
}

impl Error for RemoteError {}

impl From<PayloadError> for RemoteError {
    fn from(value: PayloadError) -> Self {
        Self::Decode(value.to_string())
    }
}

/// Kind of full-week regeneration requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerationMode {
    /// Brand-new routine.
    Create,
    /// Recompute the routine with changed availability for `day`.
    Update { off_day: bool, day: Weekday },
}

impl RegenerationMode {
    /// Stable label used in logs and FFI responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update { .. } => "update",
        }
    }
}

/// Remote completion write keyed by the activity natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionUpdate {
    pub day: Weekday,
    pub activity_name: String,
    pub activity_type: ActivityType,
    pub completed: bool,
}

/// Remote routine service used by the synchronizer and regeneration flows.
#[async_trait]
pub trait RoutineRemote: Send + Sync {
    /// Fetches the current week; `Ok(None)` when the server has none.
    async fn fetch_routine(&self) -> RemoteResult<Option<WeeklyRoutine>>;

    /// Requests a full replacement week.
    async fn regenerate_routine(
        &self,
        user_id: u64,
        mode: RegenerationMode,
    ) -> RemoteResult<WeeklyRoutine>;

    /// Stores one activity completion flag.
    async fn set_activity_completion(&self, update: &CompletionUpdate) -> RemoteResult<()>;
}
