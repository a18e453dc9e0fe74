use crate::model::attendance::Session;
use crate::timekeeping::window::{EVENING, Minutes, NOON, minutes_of_day};

/// Single source of session identity. Every path that needs to know which
/// session a time belongs to (check-in, checkout, consolidation, reports)
/// goes through here.
pub fn classify_session(minutes: Minutes) -> Session {
    if minutes < NOON {
        Session::Morning
    } else if minutes < EVENING {
        Session::Afternoon
    } else {
        Session::Overtime
    }
}

/// Classify a stored clock string. Unreadable values have no session.
pub fn classify_time_in(time_in: &str) -> Option<Session> {
    minutes_of_day(time_in).map(classify_session)
}
