//! FFI use-case API for the Flutter routine screen.
//!
//! # Responsibility
//! - Expose the routine screen operations to Dart via FRB.
//! - Own the process-wide routine session behind `configure_session`.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported inside response envelopes, never thrown.
//! - The session is configured once; later calls must repeat the same
//!   settings.

use flexiplan_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ClientConfig, CompletionSummary, DateProvider, DisplayedTask, HttpRoutineRemote, Notice,
    RegenerationMode, RoutineError, RoutineRemote, RoutineSession, SystemDateProvider, Weekday,
};
use log::info;
use std::sync::{Arc, OnceLock};

static ROUTINE_SESSION: OnceLock<ConfiguredSession> = OnceLock::new();

struct ConfiguredSession {
    config: ClientConfig,
    session: RoutineSession<SystemDateProvider>,
}

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Binds the routine session to a backend and user.
///
/// # FFI contract
/// - Sync call, no network traffic.
/// - Idempotent for identical settings; different settings are rejected.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_session(base_url: String, user_id: u64, access_token: Option<String>) -> String {
    match install_session(base_url.as_str(), user_id, access_token) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the displayed day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayViewItem {
    /// Row id valid until the next view refresh.
    pub task_id: u32,
    pub name: String,
    pub icon: String,
    pub time_range_label: String,
    pub completed: bool,
    /// Activity type label (`task|hobby|other`).
    pub activity_type: String,
}

/// Header and rows of the day under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayViewResponse {
    /// Whether the view could be built at all.
    pub ok: bool,
    /// Whether a routine is cached; `items` is empty otherwise.
    pub loaded: bool,
    /// Load status label (`absent|loading|ready|failed`).
    pub status: String,
    pub day_name: String,
    pub day_label: String,
    pub date_label: String,
    pub items: Vec<DayViewItem>,
    /// Changes whenever the view needs re-rendering.
    pub revision: u64,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl DayViewResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            loaded: false,
            status: String::new(),
            day_name: String::new(),
            day_label: String::new(),
            date_label: String::new(),
            items: Vec::new(),
            revision: 0,
            message: message.into(),
        }
    }
}

/// Result of an async routine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// New completion value for toggles.
    pub completed: Option<bool>,
    /// Load status label after the command.
    pub status: String,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl RoutineActionResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            completed: None,
            status: String::new(),
            message: message.into(),
        }
    }
}

/// Queued user-visible notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineNotice {
    /// Notice kind label (`completion_reverted|stale_task|regeneration_failed`).
    pub kind: String,
    pub message: String,
}

/// Completion rate and scheduled time of one weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCompletionItem {
    pub day_name: String,
    pub completed: u32,
    pub total: u32,
    pub percentage: f64,
    pub minutes: u32,
}

/// Completion rate and scheduled time of one activity name.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCompletionItem {
    pub name: String,
    pub completed: u32,
    pub total: u32,
    pub percentage: f64,
    pub minutes: u32,
}

/// Completion analytics of the cached week.
///
/// Pattern day names are empty when the week has no activities.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSummaryResponse {
    pub ok: bool,
    pub completed: u32,
    pub total: u32,
    pub percentage: f64,
    /// Monday first; every weekday is present.
    pub days: Vec<DayCompletionItem>,
    /// Sorted by name.
    pub activities: Vec<ActivityCompletionItem>,
    /// Longest scheduled first, at most five names.
    pub most_frequent_activities: Vec<String>,
    pub average_daily_minutes: f64,
    pub most_busy_day: String,
    pub least_busy_day: String,
    pub day_with_most_activities: String,
    pub day_with_least_activities: String,
    pub message: String,
}

impl CompletionSummaryResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            completed: 0,
            total: 0,
            percentage: 0.0,
            days: Vec::new(),
            activities: Vec::new(),
            most_frequent_activities: Vec::new(),
            average_daily_minutes: 0.0,
            most_busy_day: String::new(),
            least_busy_day: String::new(),
            day_with_most_activities: String::new(),
            day_with_least_activities: String::new(),
            message: message.into(),
        }
    }
}

/// Returns the day under the cursor.
///
/// # FFI contract
/// - Sync call, in-memory only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_day_view() -> DayViewResponse {
    match configured() {
        Ok(session) => day_view(session),
        Err(err) => DayViewResponse::failure(err),
    }
}

/// Moves the cursor by `delta` days and returns the resulting view.
///
/// Moves leaving the current week are ignored and reported in `message`.
///
/// # FFI contract
/// - Sync call, in-memory only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_navigate(delta: i32) -> DayViewResponse {
    match configured() {
        Ok(session) => navigate_view(session, i64::from(delta)),
        Err(err) => DayViewResponse::failure(err),
    }
}

/// Takes all queued notices, oldest first.
///
/// # FFI contract
/// - Sync call, in-memory only.
/// - Returns an empty list before configuration.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_drain_notices() -> Vec<RoutineNotice> {
    match configured() {
        Ok(session) => session
            .drain_notices()
            .into_iter()
            .map(to_routine_notice)
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Computes completion analytics of the cached week.
///
/// # FFI contract
/// - Sync call, in-memory only.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn routine_completion_summary() -> CompletionSummaryResponse {
    let result = configured().and_then(|session| {
        session
            .completion_summary()
            .map_err(|err| format!("routine_completion_summary failed: {err}"))
    });
    match result {
        Ok(summary) => summary_response(summary),
        Err(message) => CompletionSummaryResponse::failure(message),
    }
}

/// Fetches the user's routine from the backend.
///
/// # FFI contract
/// - Async call, one network request.
/// - Never panics.
pub async fn routine_load() -> RoutineActionResponse {
    let session = match configured() {
        Ok(session) => session,
        Err(err) => return RoutineActionResponse::failure(err),
    };
    let result = session.load().await.map(|_| None);
    action_response(session, "routine_load", result)
}

/// Requests a brand-new routine for the week.
///
/// # FFI contract
/// - Async call, one network request.
/// - Never panics.
pub async fn routine_regenerate() -> RoutineActionResponse {
    let session = match configured() {
        Ok(session) => session,
        Err(err) => return RoutineActionResponse::failure(err),
    };
    let result = session
        .regenerate(RegenerationMode::Create)
        .await
        .map(|()| None);
    action_response(session, "routine_regenerate", result)
}

/// Toggles completion of row `task_id` from the latest day view.
///
/// The flag flips locally before the request and flips back on failure.
///
/// # FFI contract
/// - Async call, at most one network request.
/// - Never panics.
pub async fn routine_toggle_completion(task_id: u32) -> RoutineActionResponse {
    let session = match configured() {
        Ok(session) => session,
        Err(err) => return RoutineActionResponse::failure(err),
    };
    let result = session
        .toggle_completion(task_id as usize)
        .await
        .map(Some);
    action_response(session, "routine_toggle_completion", result)
}

/// Marks today as an off day (or not) and regenerates the week.
///
/// # FFI contract
/// - Async call, one network request.
/// - Never panics.
pub async fn routine_set_off_day(off_day: bool) -> RoutineActionResponse {
    let session = match configured() {
        Ok(session) => session,
        Err(err) => return RoutineActionResponse::failure(err),
    };
    let result = session.set_off_day(off_day).await.map(|()| None);
    action_response(session, "routine_set_off_day", result)
}

fn install_session(base_url: &str, user_id: u64, access_token: Option<String>) -> Result<(), String> {
    let config = ClientConfig::new(base_url, user_id, access_token)
        .map_err(|err| format!("configure_session failed: {err}"))?;

    if let Some(active) = ROUTINE_SESSION.get() {
        return ensure_same_config(&active.config, &config);
    }

    let remote: Arc<dyn RoutineRemote> = Arc::new(
        HttpRoutineRemote::new(config.clone())
            .map_err(|err| format!("configure_session failed: {err}"))?,
    );
    let session = RoutineSession::new(remote, config.user_id, SystemDateProvider);
    let active = ROUTINE_SESSION.get_or_init(|| ConfiguredSession {
        config: config.clone(),
        session,
    });
    info!(
        "event=session_configured module=ffi status=ok user_id={}",
        active.config.user_id
    );
    ensure_same_config(&active.config, &config)
}

fn ensure_same_config(active: &ClientConfig, requested: &ClientConfig) -> Result<(), String> {
    if active == requested {
        Ok(())
    } else {
        Err(format!(
            "session already configured for `{}` (user {}); refusing to switch",
            active.base_url, active.user_id
        ))
    }
}

fn configured() -> Result<&'static RoutineSession<SystemDateProvider>, String> {
    ROUTINE_SESSION
        .get()
        .map(|active| &active.session)
        .ok_or_else(|| "routine session is not configured; call configure_session first".to_string())
}

fn day_view<C: DateProvider>(session: &RoutineSession<C>) -> DayViewResponse {
    let (loaded, items, message) = match session.current_display_list() {
        Ok(tasks) => (true, tasks.into_iter().map(to_day_view_item).collect(), String::new()),
        Err(err @ RoutineError::NotLoaded) => (false, Vec::new(), err.to_string()),
        Err(err) => return DayViewResponse::failure(format!("routine_day_view failed: {err}")),
    };
    DayViewResponse {
        ok: true,
        loaded,
        status: session.load_status().as_str().to_string(),
        day_name: session.current_day().as_str().to_string(),
        day_label: session.current_day_label(),
        date_label: session.current_date_label(),
        items,
        revision: session.revision(),
        message,
    }
}

fn navigate_view<C: DateProvider>(session: &RoutineSession<C>, delta: i64) -> DayViewResponse {
    let moved = session.navigate(delta);
    let mut view = day_view(session);
    if view.ok && !moved {
        view.message = "already at the edge of this week".to_string();
    }
    view
}

fn action_response<C: DateProvider>(
    session: &RoutineSession<C>,
    operation: &str,
    result: Result<Option<bool>, RoutineError>,
) -> RoutineActionResponse {
    let status = session.load_status().as_str().to_string();
    match result {
        Ok(completed) => RoutineActionResponse {
            ok: true,
            completed,
            status,
            message: String::new(),
        },
        Err(err) => RoutineActionResponse {
            ok: false,
            completed: None,
            status,
            message: format!("{operation} failed: {err}"),
        },
    }
}

fn summary_response(summary: CompletionSummary) -> CompletionSummaryResponse {
    let day_name = |day: Option<Weekday>| {
        day.map(|day| day.as_str().to_string())
            .unwrap_or_default()
    };
    let days = summary
        .by_day
        .iter()
        .map(|(day, rate)| DayCompletionItem {
            day_name: day.as_str().to_string(),
            completed: rate.completed,
            total: rate.total,
            percentage: rate.percentage(),
            minutes: summary.minutes_by_day.get(day).copied().unwrap_or(0),
        })
        .collect();
    let activities = summary
        .by_activity
        .iter()
        .map(|(name, rate)| ActivityCompletionItem {
            name: name.clone(),
            completed: rate.completed,
            total: rate.total,
            percentage: rate.percentage(),
            minutes: summary.minutes_by_activity.get(name).copied().unwrap_or(0),
        })
        .collect();
    CompletionSummaryResponse {
        ok: true,
        completed: summary.overall.completed,
        total: summary.overall.total,
        percentage: summary.overall.percentage(),
        days,
        activities,
        most_frequent_activities: summary
            .most_frequent_activities
            .into_iter()
            .map(|entry| entry.name)
            .collect(),
        average_daily_minutes: summary.average_daily_minutes,
        most_busy_day: day_name(summary.patterns.most_busy_day),
        least_busy_day: day_name(summary.patterns.least_busy_day),
        day_with_most_activities: day_name(summary.patterns.day_with_most_activities),
        day_with_least_activities: day_name(summary.patterns.day_with_least_activities),
        message: String::new(),
    }
}

fn to_day_view_item(task: DisplayedTask) -> DayViewItem {
    DayViewItem {
        task_id: u32::try_from(task.id).unwrap_or(u32::MAX),
        name: task.name,
        icon: task.icon.to_string(),
        time_range_label: task.time_range_label,
        completed: task.completed,
        activity_type: task.activity_type.as_str().to_string(),
    }
}

fn to_routine_notice(notice: Notice) -> RoutineNotice {
    RoutineNotice {
        kind: notice.kind.as_str().to_string(),
        message: notice.message,
    }
}
