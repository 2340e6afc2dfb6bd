//! Current-date providers.
//!
//! Week bounds and day labels depend on "today"; every consumer receives a
//! provider instead of reading the system clock directly.

use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Source of the local calendar date.
pub trait DateProvider: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Reads the device local date on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDateProvider;

impl DateProvider for SystemDateProvider {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDateProvider(pub NaiveDate);

impl DateProvider for FixedDateProvider {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<T: DateProvider + ?Sized> DateProvider for Arc<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
