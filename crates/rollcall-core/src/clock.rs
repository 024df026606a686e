//! Calendar source for "today".
//!
//! Attendance is keyed by the serving process's local calendar date. Services
//! receive the date from a [`Clock`] held in application state so tests can
//! pin it.

use chrono::{Local, NaiveDate};
use std::fmt::Debug;

pub trait Clock: Send + Sync + Debug {
    fn today(&self) -> NaiveDate;
}

/// Wall-clock date in the server's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always reports the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let clock = FixedClock(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.today(), clock.today());
    }
}
