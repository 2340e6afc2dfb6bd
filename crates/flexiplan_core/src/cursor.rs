//! Bounded day cursor over the current calendar week.
//!
//! # Responsibility
//! - Select which day of the week containing "today" is displayed.
//! - Produce header labels for the selected day.
//!
//! # Invariants
//! - Effective offset always lies in `week_bounds(today)` for the date
//!   returned by the provider at call time.
//! - Out-of-range moves are ignored, never reported as errors.
//! - A stored offset left outside the week by a date change is clamped back
//!   before use.

use crate::clock::DateProvider;
use crate::model::weekday::Weekday;
use chrono::{Datelike, Days, NaiveDate};
use log::debug;

/// Offset-based pointer into the current calendar week.
#[derive(Debug)]
pub struct DayCursor<C: DateProvider> {
    clock: C,
    offset: i64,
    moves: u64,
    anchor: NaiveDate,
}

impl<C: DateProvider> DayCursor<C> {
    /// Creates a cursor pointing at today.
    pub fn new(clock: C) -> Self {
        let anchor = clock.today();
        Self {
            clock,
            offset: 0,
            moves: 0,
            anchor,
        }
    }

    /// Date returned by the injected provider.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Inclusive `(min, max)` offsets of the week containing today.
    pub fn bounds(&self) -> (i64, i64) {
        week_bounds(self.today())
    }

    /// Current offset in days from today.
    pub fn offset(&self) -> i64 {
        let (min, max) = self.bounds();
        self.offset.clamp(min, max)
    }

    /// Applied moves plus days elapsed since the cursor was created.
    ///
    /// Changes whenever the displayed day does, including a date rollover
    /// that clamps the offset. Assumes the provider's date never goes back.
    pub fn revision(&self) -> u64 {
        let elapsed = self.today().signed_duration_since(self.anchor).num_days();
        self.moves + u64::try_from(elapsed).unwrap_or(0)
    }

    /// Moves by `delta` days when the target stays inside the week.
    ///
    /// Returns `true` when the move was applied.
    pub fn move_by(&mut self, delta: i64) -> bool {
        let (min, max) = self.bounds();
        self.offset = self.offset.clamp(min, max);

        let applied = match self.offset.checked_add(delta) {
            Some(target) if (min..=max).contains(&target) => {
                self.offset = target;
                self.moves += 1;
                true
            }
            _ => false,
        };
        if !applied {
            debug!(
                "event=cursor_move module=cursor status=ignored offset={} delta={} min={} max={}",
                self.offset, delta, min, max
            );
        }
        applied
    }

    /// Weekday the cursor points at.
    pub fn current_day_name(&self) -> Weekday {
        let today_index = i64::from(self.today().weekday().num_days_from_monday());
        Weekday::from_index(today_index + self.offset() + 7)
    }

    /// Human label for the selected day relative to today.
    pub fn current_day_label(&self) -> String {
        day_label(self.offset(), self.current_day_name())
    }

    /// Calendar date the cursor points at.
    pub fn current_date(&self) -> NaiveDate {
        let today = self.today();
        let offset = self.offset();
        let shifted = if offset >= 0 {
            today.checked_add_days(Days::new(offset.unsigned_abs()))
        } else {
            today.checked_sub_days(Days::new(offset.unsigned_abs()))
        };
        shifted.unwrap_or(today)
    }

    /// Header date such as `Dec 11 • Wednesday`.
    pub fn current_date_label(&self) -> String {
        format!(
            "{} • {}",
            self.current_date().format("%b %-d"),
            self.current_day_name()
        )
    }
}

/// Inclusive offset range navigable from `today`.
///
/// The lower bound reaches Monday. The upper bound counts the days left
/// until the weekend as `6 - days_since_sunday`, so a Wednesday spans
/// `[-2, 3]` and only a Sunday can reach itself.
pub fn week_bounds(today: NaiveDate) -> (i64, i64) {
    let since_monday = i64::from(today.weekday().num_days_from_monday());
    let max = match today.weekday().num_days_from_sunday() {
        0 => 0,
        since_sunday => 6 - i64::from(since_sunday),
    };
    (-since_monday, max)
}

/// Label for a day `offset` days away from today.
pub fn day_label(offset: i64, day: Weekday) -> String {
    match offset {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        2..=6 => format!("{offset} days later"),
        -1 => "1 day ago".to_string(),
        -6..=-2 => format!("{} days ago", -offset),
        _ => day.as_str().to_string(),
    }
}
