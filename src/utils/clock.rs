use chrono::{DateTime, NaiveDate, Utc};

use super::time::local_date;

/// Represents an entity responsible for providing dates across application. Entry ids, record
/// dates and day summaries are all derived from it, so tests can pin the calendar.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;

    /// Calendar day in the user's local time zone. Day summaries and streaks are counted in
    /// local days, not UTC days.
    fn today(&self) -> NaiveDate {
        local_date(self.time())
    }
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
