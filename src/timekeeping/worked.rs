use chrono::{DateTime, FixedOffset};

use crate::model::attendance::{AttendanceEntry, Session};
use crate::timekeeping::window::{Minutes, minutes_of, minutes_of_day, rules};

/// Earliest checkout for a session.
pub fn checkout_allowed_from(session: Session) -> Minutes {
    rules(session).checkout_from
}

/// True when the entry is still open and `now` has reached the checkout
/// boundary of its session. A checkout on a later day than the check-in is
/// always past the boundary.
pub fn can_check_out_now(entry: &AttendanceEntry, now: DateTime<FixedOffset>) -> bool {
    if !entry.is_open() {
        return false;
    }

    let Some(session) = entry.session() else {
        return false;
    };

    let today = now.date_naive();
    if today > entry.date {
        return true;
    }

    today == entry.date && minutes_of(now.time()) >= checkout_allowed_from(session)
}

/// Credited minutes for one session.
///
/// Arrivals inside the grace period are credited from the session baseline,
/// later ones from the actual arrival. Checkouts after the session cap earn
/// nothing extra. Unreadable times credit 0.
pub fn compute_session_minutes(session: Session, time_in: &str, time_out: &str) -> Minutes {
    let (Some(start), Some(end)) = (minutes_of_day(time_in), minutes_of_day(time_out)) else {
        return 0;
    };
    credited_minutes(session, start, end)
}

pub fn credited_minutes(session: Session, time_in: Minutes, time_out: Minutes) -> Minutes {
    if time_in == time_out {
        return 0;
    }

    let rules = rules(session);
    let effective_start = match rules.grace_end {
        Some(grace_end) if time_in <= grace_end => rules.baseline,
        _ => time_in,
    };
    let effective_end = time_out.min(rules.end_cap);

    effective_end.saturating_sub(effective_start)
}

/// Minutes an entry's own session contributes to totals: the value stored at
/// checkout when present, otherwise recomputed from its times. Open entries
/// count 0. Overtime markers on the row are not included.
pub fn entry_worked_minutes(entry: &AttendanceEntry) -> Minutes {
    if let Some(stored) = entry.worked_minutes {
        return stored;
    }

    match (entry.session(), entry.time_out.as_deref()) {
        (Some(session), Some(time_out)) => {
            compute_session_minutes(session, &entry.time_in, time_out)
        }
        _ => 0,
    }
}

/// Overtime recorded through the `ot_time_in`/`ot_time_out` markers of a
/// row. `None` without an `ot_time_in`; 0 while `ot_time_out` is missing.
pub fn marker_overtime_minutes(entry: &AttendanceEntry) -> Option<Minutes> {
    let ot_in = entry.ot_time_in.as_deref()?;
    Some(match entry.ot_time_out.as_deref() {
        Some(ot_out) => compute_session_minutes(Session::Overtime, ot_in, ot_out),
        None => 0,
    })
}
