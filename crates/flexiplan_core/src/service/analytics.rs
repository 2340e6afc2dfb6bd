//! Completion and time analytics over the cached week.
//!
//! Rates are computed locally from the session cache, so they reflect
//! optimistic flips immediately. Time figures are scheduled minutes taken
//! from each record's time range; unparseable or reversed ranges count as
//! zero minutes.

use crate::model::activity::ActivityType;
use crate::model::routine::WeeklyRoutine;
use crate::model::weekday::Weekday;
use std::collections::BTreeMap;

/// Number of entries kept in `most_frequent_activities`.
pub const MOST_FREQUENT_LIMIT: usize = 5;

/// Completed vs. scheduled activity counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionRate {
    pub completed: u32,
    pub total: u32,
}

impl CompletionRate {
    /// Completion percentage in `0.0..=100.0`; `0.0` when nothing is scheduled.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        f64::from(self.completed) * 100.0 / f64::from(self.total)
    }

    fn record(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        }
    }
}

/// Scheduled time of one activity name across the week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityTime {
    pub name: String,
    pub minutes: u32,
}

/// Busiest and quietest days of the week.
///
/// Ties resolve to the earliest weekday. All fields are `None` when the
/// week has no activities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyPatterns {
    /// Day with the most scheduled minutes.
    pub most_busy_day: Option<Weekday>,
    /// Day with the fewest scheduled minutes.
    pub least_busy_day: Option<Weekday>,
    pub day_with_most_activities: Option<Weekday>,
    pub day_with_least_activities: Option<Weekday>,
}

/// Week-level completion and time breakdown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionSummary {
    pub overall: CompletionRate,
    /// Every weekday is present, including days without activities.
    pub by_day: BTreeMap<Weekday, CompletionRate>,
    /// Only types that occur in the week are present.
    pub by_type: BTreeMap<ActivityType, CompletionRate>,
    /// Keyed by activity name across all days.
    pub by_activity: BTreeMap<String, CompletionRate>,
    /// Every weekday is present.
    pub minutes_by_day: BTreeMap<Weekday, u32>,
    pub minutes_by_type: BTreeMap<ActivityType, u32>,
    pub minutes_by_activity: BTreeMap<String, u32>,
    /// Scheduled minutes per day averaged over all seven days.
    pub average_daily_minutes: f64,
    /// Activities with the most scheduled time, longest first.
    pub most_frequent_activities: Vec<ActivityTime>,
    pub patterns: WeeklyPatterns,
}

/// Summarizes completion and time usage of a full week.
pub fn summarize(routine: &WeeklyRoutine) -> CompletionSummary {
    let mut summary = CompletionSummary::default();
    let mut counts_by_day = BTreeMap::new();
    for (day, records) in routine.iter() {
        let day_rate = summary.by_day.entry(day).or_default();
        let day_minutes = summary.minutes_by_day.entry(day).or_default();
        counts_by_day.insert(day, records.len());
        for record in records {
            let minutes = record.duration_minutes().unwrap_or(0);
            day_rate.record(record.completed);
            *day_minutes += minutes;
            summary.overall.record(record.completed);
            summary
                .by_type
                .entry(record.kind)
                .or_default()
                .record(record.completed);
            summary
                .by_activity
                .entry(record.name.clone())
                .or_default()
                .record(record.completed);
            if minutes > 0 {
                *summary.minutes_by_type.entry(record.kind).or_default() += minutes;
            }
            *summary
                .minutes_by_activity
                .entry(record.name.clone())
                .or_default() += minutes;
        }
    }

    let total_minutes: u32 = summary.minutes_by_day.values().sum();
    summary.average_daily_minutes = f64::from(total_minutes) / 7.0;
    summary.most_frequent_activities = most_frequent(&summary.minutes_by_activity);
    if summary.overall.total > 0 {
        summary.patterns = WeeklyPatterns {
            most_busy_day: extreme_day(&summary.minutes_by_day, |candidate, best| candidate > best),
            least_busy_day: extreme_day(&summary.minutes_by_day, |candidate, best| candidate < best),
            day_with_most_activities: extreme_day(&counts_by_day, |candidate, best| {
                candidate > best
            }),
            day_with_least_activities: extreme_day(&counts_by_day, |candidate, best| {
                candidate < best
            }),
        };
    }
    summary
}

fn most_frequent(minutes_by_activity: &BTreeMap<String, u32>) -> Vec<ActivityTime> {
    let mut ranked = minutes_by_activity
        .iter()
        .map(|(name, minutes)| ActivityTime {
            name: name.clone(),
            minutes: *minutes,
        })
        .collect::<Vec<_>>();
    // Stable sort keeps name order for equal durations.
    ranked.sort_by(|left, right| right.minutes.cmp(&left.minutes));
    ranked.truncate(MOST_FREQUENT_LIMIT);
    ranked
}

/// First weekday whose value beats every earlier one under `better`.
fn extreme_day<T: Copy>(
    values: &BTreeMap<Weekday, T>,
    better: impl Fn(T, T) -> bool,
) -> Option<Weekday> {
    let mut best: Option<(Weekday, T)> = None;
    for (day, value) in values {
        match best {
            Some((_, current)) if !better(*value, current) => {}
            _ => best = Some((*day, *value)),
        }
    }
    best.map(|(day, _)| day)
}
