//! Core logic of the FlexiPlan weekly routine screen.
//! This crate owns the routine cache, the day cursor and the optimistic
//! completion flow; UI hosts only render what it projects.

pub mod cache;
pub mod clock;
pub mod config;
pub mod cursor;
pub mod logging;
pub mod model;
pub mod projection;
pub mod remote;
pub mod service;

pub use cache::{CacheError, CacheResult, SharedRoutineCache, WeeklyRoutineCache};
pub use clock::{DateProvider, FixedDateProvider, SystemDateProvider};
pub use config::{ClientConfig, ConfigError};
pub use cursor::DayCursor;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::activity::{ActivityKey, ActivityRecord, ActivityType};
pub use model::routine::WeeklyRoutine;
pub use model::weekday::Weekday;
pub use projection::{project, DisplayedTask};
pub use remote::{
    CompletionUpdate, HttpRoutineRemote, RegenerationMode, RemoteError, RemoteResult,
    RoutineRemote,
};
pub use service::analytics::{
    summarize, ActivityTime, CompletionRate, CompletionSummary, WeeklyPatterns,
};
pub use service::completion::CompletionSynchronizer;
pub use service::error::{RoutineError, RoutineResult};
pub use service::regeneration::{LoadStatus, RegenerationController};
pub use service::session::{Notice, NoticeKind, RoutineSession};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
