use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::error::{AttendanceError, StoreError};
use crate::model::attendance::{
    AttendanceEntry, AttendanceFilter, AttendancePatch, NewAttendance, Session,
};
use crate::service::overtime::OvertimeApprovals;
use crate::store::AttendanceStore;
use crate::timekeeping::lateness::evaluate_check_in;
use crate::timekeeping::session::classify_session;
use crate::timekeeping::window::{
    clock_of_minutes, format_clock, format_minutes, minutes_of, minutes_of_day, normalize_clock,
    rules,
};
use crate::timekeeping::worked::{
    can_check_out_now, checkout_allowed_from, compute_session_minutes, credited_minutes,
};

/// Ordinary (non-overtime) check-ins allowed per person per day.
pub const MAX_ORDINARY_CHECK_INS: usize = 2;

#[derive(Debug, Default)]
pub struct CheckOutDetails {
    pub work_documentation: Option<String>,
    pub attachments: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentSession {
    pub entry: AttendanceEntry,
    pub session: Option<Session>,
    pub can_check_out: bool,
    #[schema(example = "12:00", nullable = true)]
    pub checkout_allowed_from: Option<String>,
}

async fn open_entry(
    store: &dyn AttendanceStore,
    person_id: u64,
) -> Result<Option<AttendanceEntry>, StoreError> {
    let mut open = store.list_attendance(&AttendanceFilter::open_for(person_id)).await?;
    if open.len() > 1 {
        warn!(person_id, count = open.len(), "More than one open attendance entry");
    }
    Ok(open.pop())
}

/// Open a session at `now`.
///
/// Order matters: the open-session check runs before anything is computed,
/// and lateness is evaluated once, here, and stored.
#[instrument(skip(store, approvals, photo_proof, now), fields(at = %now))]
pub async fn check_in(
    store: &dyn AttendanceStore,
    approvals: &OvertimeApprovals,
    person_id: u64,
    now: DateTime<FixedOffset>,
    photo_proof: Option<String>,
) -> Result<AttendanceEntry, AttendanceError> {
    if open_entry(store, person_id).await?.is_some() {
        info!("Check-in refused: session still open");
        return Err(AttendanceError::MustCheckOutFirst);
    }

    let today = now.date_naive();
    let minutes = minutes_of(now.time());
    let session = classify_session(minutes);

    if !rules(session).check_in.contains(minutes) {
        info!(%session, "Check-in refused: outside window");
        return Err(AttendanceError::OutsideCheckInWindow {
            at: format_minutes(minutes),
        });
    }

    if session == Session::Overtime && !approvals.is_approved(person_id, today).await? {
        info!("Check-in refused: overtime not approved");
        return Err(AttendanceError::OvertimeNotApproved { date: today });
    }

    let todays = store
        .list_attendance(&AttendanceFilter::on_date(person_id, today))
        .await?;

    if todays.iter().any(|e| e.session() == Some(session)) {
        return Err(AttendanceError::AlreadyCheckedIn { session });
    }

    let ordinary = todays
        .iter()
        .filter(|e| e.session() != Some(Session::Overtime))
        .count();
    if session != Session::Overtime && ordinary >= MAX_ORDINARY_CHECK_INS {
        return Err(AttendanceError::DailyLimitReached);
    }

    let evaluation = evaluate_check_in(now.time());

    let inserted = store
        .insert_attendance(NewAttendance {
            person_id,
            date: today,
            time_in: format_clock(now.time()),
            status: evaluation.status,
            late_minutes: evaluation.late_minutes,
            late_deduction_hours: evaluation.deduction_hours,
            photo_proof,
        })
        .await;

    let entry = match inserted {
        Ok(entry) => entry,
        // lost a race with a concurrent check-in
        Err(StoreError::Conflict) => return Err(AttendanceError::MustCheckOutFirst),
        Err(e) => return Err(e.into()),
    };

    info!(
        entry_id = entry.id,
        %session,
        status = %entry.status,
        deduction_hours = entry.late_deduction_hours,
        "Checked in"
    );
    Ok(entry)
}

/// Close the person's open session at `now`.
#[instrument(skip(store, details, now), fields(at = %now))]
pub async fn check_out(
    store: &dyn AttendanceStore,
    person_id: u64,
    now: DateTime<FixedOffset>,
    details: CheckOutDetails,
) -> Result<AttendanceEntry, AttendanceError> {
    let entry = open_entry(store, person_id)
        .await?
        .ok_or(AttendanceError::NoOpenSession)?;

    let (Some(session), Some(time_in)) = (entry.session(), minutes_of_day(&entry.time_in)) else {
        return Err(AttendanceError::invalid(format!(
            "attendance {} has an unreadable check-in time; contact HR",
            entry.id
        )));
    };

    if !can_check_out_now(&entry, now) {
        info!(%session, "Checkout refused: too early");
        return Err(AttendanceError::CheckoutTooEarly {
            session,
            allowed_from: format_minutes(checkout_allowed_from(session)),
        });
    }

    // a checkout on a later day closes the session at its cap on the entry's date
    let (credited_end, time_out) = if now.date_naive() > entry.date {
        let cap = rules(session).end_cap;
        warn!(entry_id = entry.id, %session, "Forgotten session closed at its cap");
        (cap, clock_of_minutes(cap))
    } else {
        (minutes_of(now.time()), format_clock(now.time()))
    };
    let worked = credited_minutes(session, time_in, credited_end);

    let work_documentation = details
        .work_documentation
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let patch = AttendancePatch {
        time_out: Some(time_out),
        worked_minutes: Some(worked),
        work_documentation,
        attachments: (!details.attachments.is_empty()).then_some(details.attachments),
        ..Default::default()
    };

    let updated = store
        .update_attendance(entry.id, patch)
        .await?
        .ok_or_else(|| AttendanceError::not_found("Attendance entry"))?;

    info!(entry_id = updated.id, %session, worked_minutes = worked, "Checked out");
    Ok(updated)
}

/// The person's open entry, if any, and whether it can be closed at `now`.
pub async fn current_session(
    store: &dyn AttendanceStore,
    person_id: u64,
    now: DateTime<FixedOffset>,
) -> Result<Option<CurrentSession>, AttendanceError> {
    let Some(entry) = open_entry(store, person_id).await? else {
        return Ok(None);
    };

    let session = entry.session();
    Ok(Some(CurrentSession {
        can_check_out: can_check_out_now(&entry, now),
        checkout_allowed_from: session.map(|s| format_minutes(checkout_allowed_from(s))),
        session,
        entry,
    }))
}

/// HR fix-up of an entry. Status and deductions stay as recorded.
#[derive(Debug, Default)]
pub struct Correction {
    pub time_out: Option<String>,
    pub ot_time_in: Option<String>,
    pub ot_time_out: Option<String>,
    pub work_documentation: Option<String>,
}

/// Clock strings from clients are stored in 24-hour form.
fn normalize_client_time(value: Option<String>) -> Result<Option<String>, AttendanceError> {
    value
        .map(|v| {
            normalize_clock(&v)
                .ok_or_else(|| AttendanceError::invalid(format!("unreadable time {:?}", v)))
        })
        .transpose()
}

/// Apply an HR correction. A corrected `time_out` re-credits the session's
/// worked minutes; lateness is left untouched.
#[instrument(skip(store, correction))]
pub async fn correct_entry(
    store: &dyn AttendanceStore,
    entry_id: u64,
    correction: Correction,
) -> Result<AttendanceEntry, AttendanceError> {
    let entry = store
        .list_attendance(&AttendanceFilter::entry(entry_id))
        .await?
        .pop()
        .ok_or_else(|| AttendanceError::not_found("Attendance entry"))?;

    let time_out = normalize_client_time(correction.time_out)?;
    let worked_minutes = match time_out.as_deref() {
        Some(out) => {
            let session = entry.session().ok_or_else(|| {
                AttendanceError::invalid("entry has an unreadable check-in time")
            })?;
            Some(compute_session_minutes(session, &entry.time_in, out))
        }
        None => None,
    };

    let patch = AttendancePatch {
        time_out,
        worked_minutes,
        work_documentation: correction.work_documentation,
        attachments: None,
        ot_time_in: normalize_client_time(correction.ot_time_in)?,
        ot_time_out: normalize_client_time(correction.ot_time_out)?,
    };
    if patch.is_empty() {
        return Err(AttendanceError::invalid("No fields provided for update"));
    }

    let updated = store
        .update_attendance(entry_id, patch)
        .await?
        .ok_or_else(|| AttendanceError::not_found("Attendance entry"))?;

    info!(person_id = updated.person_id, "Attendance corrected");
    Ok(updated)
}
