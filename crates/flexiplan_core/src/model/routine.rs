//! Seven-day routine model.
//!
//! # Responsibility
//! - Hold one full week of ordered activities.
//! - Make "missing day" unrepresentable: every weekday owns a (possibly
//!   empty) sequence.
//!
//! # Invariants
//! - Activity order within a day is the server order and never changes.
//! - A week is replaced as a whole; there is no per-day merge API.

use crate::model::activity::{ActivityKey, ActivityRecord};
use crate::model::weekday::Weekday;

/// One full week of activities, indexed by weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyRoutine {
    days: [Vec<ActivityRecord>; 7],
}

impl WeeklyRoutine {
    /// Creates a week where every day is empty.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a week from `(day, activities)` pairs.
    ///
    /// Days not listed stay empty. A day listed twice keeps the last entry.
    pub fn from_days(days: impl IntoIterator<Item = (Weekday, Vec<ActivityRecord>)>) -> Self {
        let mut routine = Self::empty();
        for (day, activities) in days {
            routine.days[day.index()] = activities;
        }
        routine
    }

    /// Ordered activities of one day.
    pub fn day(&self, day: Weekday) -> &[ActivityRecord] {
        &self.days[day.index()]
    }

    /// Iterates all seven days in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[ActivityRecord])> {
        Weekday::ALL
            .into_iter()
            .map(move |day| (day, self.days[day.index()].as_slice()))
    }

    /// Total activity count across the week.
    pub fn activity_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }

    /// Mutable access to every record addressed by `key`.
    pub(crate) fn matching_mut<'a>(
        &'a mut self,
        key: &'a ActivityKey,
    ) -> impl Iterator<Item = &'a mut ActivityRecord> + 'a {
        self.days[key.day.index()]
            .iter_mut()
            .filter(move |record| record.matches(key.name.as_str(), key.kind))
    }

    /// First record addressed by `key`.
    pub fn find(&self, key: &ActivityKey) -> Option<&ActivityRecord> {
        self.day(key.day)
            .iter()
            .find(|record| record.matches(key.name.as_str(), key.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::WeeklyRoutine;
    use crate::model::activity::{ActivityKey, ActivityRecord, ActivityType};
    use crate::model::weekday::Weekday;

    #[test]
    fn unlisted_days_are_present_and_empty() {
        let routine = WeeklyRoutine::from_days([(
            Weekday::Tuesday,
            vec![ActivityRecord::new("Gym", ActivityType::Hobby, "07:00", "08:00")],
        )]);

        assert_eq!(routine.iter().count(), 7);
        assert!(routine.day(Weekday::Monday).is_empty());
        assert_eq!(routine.day(Weekday::Tuesday).len(), 1);
        assert_eq!(routine.activity_count(), 1);
    }

    #[test]
    fn find_requires_matching_type() {
        let routine = WeeklyRoutine::from_days([(
            Weekday::Friday,
            vec![ActivityRecord::new("Read", ActivityType::Hobby, "20:00", "21:00")],
        )]);

        let hobby = ActivityKey::new(Weekday::Friday, "Read", ActivityType::Hobby);
        let task = ActivityKey::new(Weekday::Friday, "Read", ActivityType::Task);
        assert!(routine.find(&hobby).is_some());
        assert!(routine.find(&task).is_none());
    }
}
