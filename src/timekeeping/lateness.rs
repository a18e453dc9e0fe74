use chrono::NaiveTime;
use serde::Serialize;

use crate::model::attendance::{AttendanceStatus, Session};
use crate::timekeeping::session::classify_session;
use crate::timekeeping::window::{
    AFTERNOON_GRACE_END, AFTERNOON_START, MORNING_GRACE_END, MORNING_VERY_LATE, minutes_of,
};

/// Outcome of a check-in, frozen into the stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckInEvaluation {
    pub session: Session,
    pub status: AttendanceStatus,
    pub late_minutes: u32,
    pub deduction_hours: u32,
}

impl CheckInEvaluation {
    fn on_time(session: Session) -> Self {
        Self {
            session,
            status: AttendanceStatus::OnTime,
            late_minutes: 0,
            deduction_hours: 0,
        }
    }

    fn late(session: Session, late_minutes: u32, deduction_hours: u32) -> Self {
        Self {
            session,
            status: AttendanceStatus::Late,
            late_minutes,
            deduction_hours,
        }
    }
}

/// Run once, at check-in. Never re-run against a stored `time_in`.
pub fn evaluate_check_in(time_in: NaiveTime) -> CheckInEvaluation {
    let minutes = minutes_of(time_in);
    let session = classify_session(minutes);

    match session {
        Session::Morning => {
            if minutes <= MORNING_GRACE_END {
                CheckInEvaluation::on_time(session)
            } else if minutes < MORNING_VERY_LATE {
                CheckInEvaluation::late(session, minutes - MORNING_GRACE_END, 1)
            } else {
                CheckInEvaluation::late(session, minutes - MORNING_GRACE_END, 2)
            }
        }
        // late minutes are counted from 13:00 even though 13:05 is still on time
        Session::Afternoon => {
            if minutes <= AFTERNOON_GRACE_END {
                CheckInEvaluation::on_time(session)
            } else {
                CheckInEvaluation::late(session, minutes - AFTERNOON_START, 1)
            }
        }
        Session::Overtime => CheckInEvaluation::on_time(session),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn morning_within_grace_is_on_time() {
        for (h, m) in [(5, 0), (7, 59), (8, 0), (8, 5)] {
            let eval = evaluate_check_in(at(h, m));
            assert_eq!(eval.session, Session::Morning);
            assert_eq!(eval.status, AttendanceStatus::OnTime);
            assert_eq!(eval.deduction_hours, 0);
            assert_eq!(eval.late_minutes, 0);
        }
    }

    #[test]
    fn morning_late_costs_one_hour() {
        let eval = evaluate_check_in(at(8, 30));
        assert_eq!(eval.status, AttendanceStatus::Late);
        assert_eq!(eval.deduction_hours, 1);
        assert_eq!(eval.late_minutes, 25);

        let eval = evaluate_check_in(at(8, 59));
        assert_eq!(eval.deduction_hours, 1);
        assert_eq!(eval.late_minutes, 54);
    }

    #[test]
    fn morning_very_late_costs_two_hours() {
        let eval = evaluate_check_in(at(9, 0));
        assert_eq!(eval.status, AttendanceStatus::Late);
        assert_eq!(eval.deduction_hours, 2);

        let eval = evaluate_check_in(at(9, 15));
        assert_eq!(eval.deduction_hours, 2);
        assert_eq!(eval.late_minutes, 70);
    }

    #[test]
    fn afternoon_grace_and_lateness() {
        let eval = evaluate_check_in(at(13, 5));
        assert_eq!(eval.session, Session::Afternoon);
        assert_eq!(eval.status, AttendanceStatus::OnTime);

        let eval = evaluate_check_in(at(13, 10));
        assert_eq!(eval.status, AttendanceStatus::Late);
        assert_eq!(eval.deduction_hours, 1);
        assert_eq!(eval.late_minutes, 10);
    }

    #[test]
    fn overtime_has_no_penalty() {
        let eval = evaluate_check_in(at(21, 30));
        assert_eq!(eval.session, Session::Overtime);
        assert_eq!(eval.status, AttendanceStatus::OnTime);
        assert_eq!(eval.deduction_hours, 0);
        assert_eq!(eval.late_minutes, 0);
    }
}
