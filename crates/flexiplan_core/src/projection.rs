//! Display projection for the selected day.
//!
//! # Responsibility
//! - Turn the cached activities of the cursor day into render-ready rows.
//!
//! # Invariants
//! - Projection is pure: same cache and cursor, same output.
//! - Row ids are indexes into the day's activity order and are only valid for
//!   the render pass that produced them.
//! - Rows are never written back; completion changes go through the
//!   completion synchronizer.

use crate::cache::{CacheResult, WeeklyRoutineCache};
use crate::clock::DateProvider;
use crate::cursor::DayCursor;
use crate::model::activity::{ActivityKey, ActivityRecord, ActivityType};
use crate::model::weekday::Weekday;

/// Icon used when no dedicated entry exists for a type.
pub const DEFAULT_ACTIVITY_ICON: &str = "📌";

const ACTIVITY_ICONS: &[(ActivityType, &str)] =
    &[(ActivityType::Task, "📝"), (ActivityType::Hobby, "🎨")];

/// One render-ready row of the displayed day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedTask {
    /// Position within the day for this render pass.
    pub id: usize,
    pub name: String,
    pub icon: &'static str,
    /// `"<start>–<end>"` built from the raw time strings.
    pub time_range_label: String,
    pub completed: bool,
    pub day: Weekday,
    pub activity_type: ActivityType,
    pub activity_name: String,
}

impl DisplayedTask {
    /// Natural key of the underlying cache record.
    pub fn key(&self) -> ActivityKey {
        ActivityKey::new(self.day, self.activity_name.clone(), self.activity_type)
    }
}

/// Projects the cursor day of `cache` into display rows.
///
/// Returns `CacheError::Unloaded` when no routine has been loaded.
pub fn project<C: DateProvider>(
    cache: &WeeklyRoutineCache,
    cursor: &DayCursor<C>,
) -> CacheResult<Vec<DisplayedTask>> {
    project_day(cache, cursor.current_day_name())
}

/// Projects one explicit day of `cache` into display rows.
pub fn project_day(cache: &WeeklyRoutineCache, day: Weekday) -> CacheResult<Vec<DisplayedTask>> {
    let records = cache.get(day)?;
    Ok(records
        .iter()
        .enumerate()
        .map(|(index, record)| to_displayed_task(index, day, record))
        .collect())
}

/// Icon for an activity type, with the default fallback.
pub fn activity_icon(kind: ActivityType) -> &'static str {
    ACTIVITY_ICONS
        .iter()
        .find(|(candidate, _)| *candidate == kind)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ACTIVITY_ICON)
}

/// Time range label without timezone conversion.
pub fn time_range_label(start_time: &str, end_time: &str) -> String {
    format!("{}–{}", start_time.trim(), end_time.trim())
}

fn to_displayed_task(index: usize, day: Weekday, record: &ActivityRecord) -> DisplayedTask {
    DisplayedTask {
        id: index,
        name: record.name.clone(),
        icon: activity_icon(record.kind),
        time_range_label: time_range_label(&record.start_time, &record.end_time),
        completed: record.completed,
        day,
        activity_type: record.kind,
        activity_name: record.name.clone(),
    }
}
