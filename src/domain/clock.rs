use chrono::{NaiveDate, Utc};
use chrono_tz::Asia::Ho_Chi_Minh;

/// Source of "today" for day offsets and forecast slot selection.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Calendar date in Vietnam (UTC+7).
#[derive(Debug, Clone, Copy, Default)]
pub struct VietnamClock;

impl Clock for VietnamClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&Ho_Chi_Minh).date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
