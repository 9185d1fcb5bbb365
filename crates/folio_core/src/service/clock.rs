//! Calendar source used to stamp post dates.

use chrono::{Local, NaiveDate};

/// Supplies "today" as a calendar date.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Host-local calendar date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
