use chrono::{NaiveTime, Timelike};

use crate::model::attendance::Session;

/// Minutes since local midnight in the business timezone.
pub type Minutes = u32;

pub const fn hm(hour: u32, minute: u32) -> Minutes {
    hour * 60 + minute
}

/// ===============================
/// Session boundaries
/// ===============================
pub const MORNING_START: Minutes = hm(8, 0);
pub const MORNING_GRACE_END: Minutes = hm(8, 5);
pub const MORNING_VERY_LATE: Minutes = hm(9, 0);
pub const MORNING_END: Minutes = hm(12, 0);

pub const AFTERNOON_START: Minutes = hm(13, 0);
pub const AFTERNOON_GRACE_END: Minutes = hm(13, 5);
pub const AFTERNOON_END: Minutes = hm(17, 0);

pub const OVERTIME_START: Minutes = hm(18, 50);
pub const OVERTIME_END: Minutes = hm(22, 0);

/// Classification buckets: before noon is Morning, from 18:00 on is Overtime.
pub const NOON: Minutes = hm(12, 0);
pub const EVENING: Minutes = hm(18, 0);

/// Half-open `[start, end)` interval of minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: Minutes,
    pub end: Minutes,
}

impl Window {
    pub const fn new(start: Minutes, end: Minutes) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, minutes: Minutes) -> bool {
        minutes >= self.start && minutes < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRules {
    /// When a check-in for this session is accepted.
    pub check_in: Window,
    /// Credited start for arrivals inside the grace period.
    pub baseline: Minutes,
    /// Last minute still treated as on time. Overtime has none.
    pub grace_end: Option<Minutes>,
    /// Earliest checkout.
    pub checkout_from: Minutes,
    /// Checkouts after this earn nothing extra.
    pub end_cap: Minutes,
}

const MORNING: SessionRules = SessionRules {
    check_in: Window::new(hm(5, 0), MORNING_END),
    baseline: MORNING_START,
    grace_end: Some(MORNING_GRACE_END),
    checkout_from: MORNING_END,
    end_cap: MORNING_END,
};

const AFTERNOON: SessionRules = SessionRules {
    check_in: Window::new(hm(12, 40), AFTERNOON_END),
    baseline: AFTERNOON_START,
    grace_end: Some(AFTERNOON_GRACE_END),
    checkout_from: AFTERNOON_END,
    end_cap: AFTERNOON_END,
};

const OVERTIME: SessionRules = SessionRules {
    check_in: Window::new(OVERTIME_START, OVERTIME_END),
    baseline: OVERTIME_START,
    grace_end: None,
    checkout_from: OVERTIME_END,
    end_cap: OVERTIME_END,
};

pub fn rules(session: Session) -> &'static SessionRules {
    match session {
        Session::Morning => &MORNING,
        Session::Afternoon => &AFTERNOON,
        Session::Overtime => &OVERTIME,
    }
}

/// ===============================
/// Clock strings
/// ===============================

// 24-hour first; 12-hour variants with and without the space before AM/PM.
const CLOCK_FORMATS: &[&str] = &[
    "%H:%M:%S%.f",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
    "%I:%M:%S%p",
    "%I:%M%p",
];

/// Parse `HH:MM[:SS]` or `hh:MM[:SS] AM/PM`.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
}

pub fn minutes_of(time: NaiveTime) -> Minutes {
    time.hour() * 60 + time.minute()
}

/// Minutes since midnight of a clock string; `None` (and a warning) when it
/// cannot be read.
pub fn minutes_of_day(value: &str) -> Option<Minutes> {
    match parse_clock(value) {
        Some(t) => Some(minutes_of(t)),
        None => {
            tracing::warn!(value, "Unparsable clock value in attendance data");
            None
        }
    }
}

/// Storage form of a clock value.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

/// Re-write a clock string in storage form, if it can be read.
pub fn normalize_clock(value: &str) -> Option<String> {
    parse_clock(value).map(format_clock)
}

pub fn format_minutes(minutes: Minutes) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Minute of day in storage form (`HH:MM:SS`).
pub fn clock_of_minutes(minutes: Minutes) -> String {
    format!("{}:00", format_minutes(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_24_hour_forms() {
        assert_eq!(minutes_of_day("08:05"), Some(hm(8, 5)));
        assert_eq!(minutes_of_day("13:10:42"), Some(hm(13, 10)));
        assert_eq!(minutes_of_day(" 21:59 "), Some(hm(21, 59)));
    }

    #[test]
    fn parses_12_hour_forms() {
        assert_eq!(minutes_of_day("08:30 AM"), Some(hm(8, 30)));
        assert_eq!(minutes_of_day("01:10 PM"), Some(hm(13, 10)));
        assert_eq!(minutes_of_day("12:00 PM"), Some(hm(12, 0)));
        assert_eq!(minutes_of_day("12:15 AM"), Some(hm(0, 15)));
        assert_eq!(minutes_of_day("7:45:10 pm"), Some(hm(19, 45)));
        assert_eq!(minutes_of_day("09:00PM"), Some(hm(21, 0)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(minutes_of_day(""), None);
        assert_eq!(minutes_of_day("noon"), None);
        assert_eq!(minutes_of_day("25:00"), None);
        assert_eq!(minutes_of_day("13:00 PM"), None);
    }

    #[test]
    fn normalizes_to_storage_form() {
        assert_eq!(normalize_clock("1:05 PM").as_deref(), Some("13:05:00"));
        assert_eq!(normalize_clock("07:00").as_deref(), Some("07:00:00"));
        assert_eq!(normalize_clock("later"), None);
    }

    #[test]
    fn windows_are_half_open() {
        let afternoon = rules(Session::Afternoon).check_in;
        assert!(!afternoon.contains(hm(12, 39)));
        assert!(afternoon.contains(hm(12, 40)));
        assert!(afternoon.contains(hm(16, 59)));
        assert!(!afternoon.contains(hm(17, 0)));

        let overtime = rules(Session::Overtime).check_in;
        assert!(overtime.contains(hm(18, 50)));
        assert!(!overtime.contains(hm(22, 0)));
    }

    #[test]
    fn formats_minutes() {
        assert_eq!(format_minutes(hm(8, 5)), "08:05");
        assert_eq!(format_minutes(hm(22, 0)), "22:00");
        assert_eq!(clock_of_minutes(hm(12, 0)), "12:00:00");
    }
}
