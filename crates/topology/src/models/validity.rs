//! Validity windows of published snapshots.
//!
//! A snapshot is in effect from its own effective date until the next one
//! takes over. The latest snapshot has no end.

use chrono::NaiveDate;

/// Half-open interval `[from, until)` of dates a snapshot applies to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validity {
    pub from: NaiveDate,
    /// `None` for the latest snapshot
    pub until: Option<NaiveDate>,
}

impl Validity {
    pub fn new(from: NaiveDate, until: Option<NaiveDate>) -> Self {
        Self { from, until }
    }

    /// Whether `date` falls inside the window.
    ///
    /// Dates before the first snapshot are handled by the store, not here.
    pub fn contains(&self, date: NaiveDate) -> bool {
        if date < self.from {
            return false;
        }

        match self.until {
            Some(until) => date < until,
            None => true,
        }
    }

    pub fn is_open_ended(&self) -> bool {
        self.until.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_closed_window() {
        let validity = Validity::new(date(2012, 1, 1), Some(date(2017, 11, 1)));

        assert!(validity.contains(date(2012, 1, 1))); // first day
        assert!(validity.contains(date(2015, 6, 1)));
        assert!(!validity.contains(date(2017, 11, 1))); // successor's first day
        assert!(!validity.contains(date(2011, 12, 31)));
        assert!(!validity.is_open_ended());
    }

    #[test]
    fn test_open_window() {
        let validity = Validity::new(date(2017, 11, 1), None);

        assert!(validity.contains(date(2099, 1, 1)));
        assert!(validity.is_open_ended());
    }
}
