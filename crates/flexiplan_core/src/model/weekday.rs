//! Closed weekday enumeration used as routine keys.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Day of the calendar week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All days in calendar-week order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Zero-based index with Monday = 0.
    pub fn index(self) -> usize {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    /// Maps any integer onto the week, wrapping in both directions.
    pub fn from_index(index: i64) -> Self {
        Self::ALL[index.rem_euclid(7) as usize]
    }

    /// Stable English day name, also used as the wire key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Parses a day name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, WeekdayParseError> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| WeekdayParseError(normalized.to_string()))
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        Self::from_index(i64::from(value.num_days_from_monday()))
    }
}

/// Day name outside `Monday..Sunday`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdayParseError(pub String);

impl Display for WeekdayParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown weekday: `{}`", self.0)
    }
}

impl Error for WeekdayParseError {}

#[cfg(test)]
mod tests {
    use super::Weekday;

    #[test]
    fn from_index_wraps_negative_and_overflowing_values() {
        assert_eq!(Weekday::from_index(-1), Weekday::Sunday);
        assert_eq!(Weekday::from_index(7), Weekday::Monday);
        assert_eq!(Weekday::from_index(9), Weekday::Wednesday);
    }

    #[test]
    fn parse_is_case_insensitive_and_rejects_unknown_names() {
        assert_eq!(Weekday::parse(" friday ").expect("friday"), Weekday::Friday);
        assert_eq!(Weekday::parse("SUNDAY").expect("sunday"), Weekday::Sunday);
        let err = Weekday::parse("Funday").expect_err("unknown day must fail");
        assert_eq!(err.0, "Funday");
    }

    #[test]
    fn converts_from_chrono_weekday() {
        assert_eq!(Weekday::from(chrono::Weekday::Mon), Weekday::Monday);
        assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    }
}
