//! Activity domain model.
//!
//! # Responsibility
//! - Define one scheduled item of a routine day.
//! - Provide the natural key used to address an activity remotely.
//!
//! # Invariants
//! - `(day, name, kind)` identifies an activity within a week.
//! - Time strings are kept verbatim; this module never converts timezones.
//! - `completed` is only written by the completion synchronizer.

use crate::model::weekday::Weekday;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Category of a scheduled activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// User-defined task with a required duration.
    Task,
    /// Hobby slot placed by the routine generator.
    Hobby,
    /// Anything the generator labelled with another type.
    Other,
}

impl ActivityType {
    /// Wire value sent back to the remote service.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Hobby => "hobby",
            Self::Other => "other",
        }
    }

    /// Maps a server type label; unknown labels fall back to `Other`.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "task" => Self::Task,
            "hobby" => Self::Hobby,
            _ => Self::Other,
        }
    }
}

/// One scheduled item of a routine day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub name: String,
    pub kind: ActivityType,
    /// Raw wall-clock start, e.g. `07:00`.
    pub start_time: String,
    /// Raw wall-clock end; the slot is `[start, end)`.
    pub end_time: String,
    pub completed: bool,
}

impl ActivityRecord {
    /// Creates an uncompleted activity.
    pub fn new(
        name: impl Into<String>,
        kind: ActivityType,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            start_time: start_time.into(),
            end_time: end_time.into(),
            completed: false,
        }
    }

    /// Whether this record is addressed by `name` and `kind`.
    pub fn matches(&self, name: &str, kind: ActivityType) -> bool {
        self.kind == kind && self.name == name
    }

    /// Scheduled length of the slot in minutes.
    ///
    /// Returns `None` when either bound does not parse as `HH:MM[:SS]` or when
    /// the end is not after the start.
    pub fn duration_minutes(&self) -> Option<u32> {
        let start = parse_wall_clock(self.start_time.as_str())?;
        let end = parse_wall_clock(self.end_time.as_str())?;
        let minutes = (end - start).num_minutes();
        if minutes <= 0 {
            return None;
        }
        u32::try_from(minutes).ok()
    }
}

/// Natural key addressing one activity of the cached week.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActivityKey {
    pub day: Weekday,
    pub name: String,
    pub kind: ActivityType,
}

impl ActivityKey {
    pub fn new(day: Weekday, name: impl Into<String>, kind: ActivityType) -> Self {
        Self {
            day,
            name: name.into(),
            kind,
        }
    }
}

fn parse_wall_clock(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}
