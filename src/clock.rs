//! Source of the current instant.
//!
//! Parsing fills missing date components from "now" and the ambiguity check
//! compares parsed values against it, so both go through a [`Clock`] that
//! tests can pin.

use chrono::{Local, NaiveDateTime};

/// Provides the current local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fixed_clock_returns_given_instant() {
        let instant = NaiveDate::from_ymd_opt(2008, 4, 30)
            .unwrap()
            .and_hms_opt(5, 30, 0)
            .unwrap();
        let clock: Box<dyn Clock> = Box::new(FixedClock(instant));
        assert_eq!(clock.now(), instant);
    }
}
