//! JSON wire shapes of the routine backend.
//!
//! # Responsibility
//! - Mirror the server envelopes and activity objects.
//! - Validate a week payload into the closed seven-day model.
//!
//! # Invariants
//! - Unknown or duplicated day keys reject the whole payload.
//! - Missing days become empty days.
//! - Unknown activity types map to `ActivityType::Other`.

use crate::model::activity::{ActivityRecord, ActivityType};
use crate::model::routine::WeeklyRoutine;
use crate::model::weekday::Weekday;
use crate::remote::CompletionUpdate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Server week keyed by day name.
pub type WireWeek = BTreeMap<String, Vec<WireActivity>>;

/// Week payload validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    UnknownDay(String),
    DuplicateDay(Weekday),
    BlankActivityName(Weekday),
}

impl Display for PayloadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownDay(value) => write!(f, "unknown day key `{value}`"),
            Self::DuplicateDay(day) => write!(f, "day `{day}` appears more than once"),
            Self::BlankActivityName(day) => write!(f, "blank activity name on {day}"),
        }
    }
}

impl Error for PayloadError {}

/// One activity as sent by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireActivity {
    pub activity: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// `GET /api/user-routine/` body.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutineEnvelope {
    pub routine_data: WireWeek,
}

/// `POST|PUT /api/generate-routine/{user_id}/` body.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedRoutineEnvelope {
    pub routine: WireWeek,
}

/// `PUT /api/generate-routine/{user_id}/` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffDayRequest {
    pub off_day: bool,
    pub day: &'static str,
}

/// `POST /api/mark-activity-completed/` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest<'a> {
    pub day: &'static str,
    pub activity_name: &'a str,
    pub activity_type: &'static str,
    pub is_completed: bool,
}

impl<'a> From<&'a CompletionUpdate> for CompletionRequest<'a> {
    fn from(value: &'a CompletionUpdate) -> Self {
        Self {
            day: value.day.as_str(),
            activity_name: value.activity_name.as_str(),
            activity_type: value.activity_type.as_str(),
            is_completed: value.completed,
        }
    }
}

/// Validates a server week into the seven-day model.
pub fn routine_from_wire(week: WireWeek) -> Result<WeeklyRoutine, PayloadError> {
    let mut seen = BTreeSet::new();
    let mut days = Vec::with_capacity(week.len());
    for (raw_day, activities) in week {
        let day = Weekday::parse(raw_day.as_str())
            .map_err(|err| PayloadError::UnknownDay(err.0))?;
        if !seen.insert(day) {
            return Err(PayloadError::DuplicateDay(day));
        }
        let records = activities
            .into_iter()
            .map(|activity| record_from_wire(day, activity))
            .collect::<Result<Vec<_>, _>>()?;
        days.push((day, records));
    }
    Ok(WeeklyRoutine::from_days(days))
}

fn record_from_wire(day: Weekday, activity: WireActivity) -> Result<ActivityRecord, PayloadError> {
    let name = activity.activity.trim();
    if name.is_empty() {
        return Err(PayloadError::BlankActivityName(day));
    }
    let mut record = ActivityRecord::new(
        name,
        ActivityType::from_label(activity.activity_type.as_str()),
        activity.start_time.trim(),
        activity.end_time.trim(),
    );
    record.completed = activity.is_completed;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::{routine_from_wire, PayloadError, RoutineEnvelope};
    use crate::model::activity::ActivityType;
    use crate::model::weekday::Weekday;
    use serde_json::json;

    #[test]
    fn decodes_server_envelope_and_fills_missing_days() {
        let envelope: RoutineEnvelope = serde_json::from_value(json!({
            "routine_data": {
                "Monday": [
                    {"activity": "Office", "start_time": "09:00", "end_time": "17:00", "type": "Task", "is_completed": true},
                    {"activity": "Guitar", "start_time": "18:00", "end_time": "19:00", "type": "hobby"}
                ],
                "Sunday": []
            }
        }))
        .expect("envelope should decode");

        let routine = routine_from_wire(envelope.routine_data).expect("payload should validate");
        let monday = routine.day(Weekday::Monday);
        assert_eq!(monday.len(), 2);
        assert_eq!(monday[0].kind, ActivityType::Task);
        assert!(monday[0].completed);
        assert!(!monday[1].completed);
        assert!(routine.day(Weekday::Wednesday).is_empty());
    }

    #[test]
    fn rejects_unknown_and_case_duplicated_days() {
        let unknown = routine_from_wire(
            serde_json::from_value(json!({"Caturday": []})).expect("wire week"),
        )
        .expect_err("unknown day must fail");
        assert_eq!(unknown, PayloadError::UnknownDay("Caturday".to_string()));

        let duplicated = routine_from_wire(
            serde_json::from_value(json!({"Monday": [], "monday": []})).expect("wire week"),
        )
        .expect_err("duplicate day must fail");
        assert_eq!(duplicated, PayloadError::DuplicateDay(Weekday::Monday));
    }

    #[test]
    fn rejects_blank_activity_name() {
        let err = routine_from_wire(
            serde_json::from_value(json!({
                "Friday": [{"activity": "  ", "start_time": "08:00", "end_time": "09:00", "type": "task"}]
            }))
            .expect("wire week"),
        )
        .expect_err("blank name must fail");
        assert_eq!(err, PayloadError::BlankActivityName(Weekday::Friday));
    }

    #[test]
    fn unknown_activity_type_maps_to_other() {
        let routine = routine_from_wire(
            serde_json::from_value(json!({
                "Tuesday": [{"activity": "Lunch", "start_time": "12:00", "end_time": "12:45", "type": "meal"}]
            }))
            .expect("wire week"),
        )
        .expect("payload should validate");

        assert_eq!(routine.day(Weekday::Tuesday)[0].kind, ActivityType::Other);
        assert_eq!(routine.activity_count(), 1);
    }
}
