use chrono::{DateTime, FixedOffset, Utc};

/// Source of "now" in the business timezone. Handlers read it once per
/// request and pass the value down.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

#[cfg(test)]
pub use fixed::FixedClock;

#[cfg(test)]
mod fixed {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Mutex;

    /// Settable clock in UTC+8.
    pub struct FixedClock(Mutex<DateTime<FixedOffset>>);

    impl FixedClock {
        pub fn at(date: NaiveDate, hour: u32, minute: u32) -> Self {
            Self(Mutex::new(Self::make(date, hour, minute)))
        }

        pub fn set(&self, date: NaiveDate, hour: u32, minute: u32) {
            *self.0.lock().unwrap() = Self::make(date, hour, minute);
        }

        fn make(date: NaiveDate, hour: u32, minute: u32) -> DateTime<FixedOffset> {
            let offset = FixedOffset::east_opt(8 * 3600).unwrap();
            offset
                .from_local_datetime(&date.and_hms_opt(hour, minute, 0).unwrap())
                .unwrap()
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<FixedOffset> {
            *self.0.lock().unwrap()
        }
    }
}
