//! Where "today" comes from
//!
//! The session needs the current date to preselect the current week and to
//! expand recurring trips. Tests pin it with [`TestTimeSource`].

use chrono::{Days, Local, NaiveDate};
use std::cell::Cell;

pub trait TimeSource: std::fmt::Debug {
    /// Today's date in the user's local time zone
    fn today(&self) -> NaiveDate;
}

/// The system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn new() -> Self {
        Self
    }
}

impl TimeSource for RealTimeSource {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A calendar that only moves when told to.
///
/// ```
/// use chrono::NaiveDate;
/// use triplog::services::time_source::{TestTimeSource, TimeSource};
///
/// let clock = TestTimeSource::on(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
/// clock.advance_days(1);
/// assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
/// ```
#[derive(Debug)]
pub struct TestTimeSource {
    today: Cell<NaiveDate>,
}

impl TestTimeSource {
    pub fn on(date: NaiveDate) -> Self {
        Self {
            today: Cell::new(date),
        }
    }

    /// Move the calendar forward; saturates at the last representable date
    pub fn advance_days(&self, days: u64) {
        let current = self.today.get();
        self.today
            .set(current.checked_add_days(Days::new(days)).unwrap_or(current));
    }
}

impl TimeSource for TestTimeSource {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}
