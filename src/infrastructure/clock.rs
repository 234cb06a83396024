use crate::domain::ports::Clock;
use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one calendar day; the time of day still advances.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.today.and_time(Utc::now().time()).and_utc()
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
