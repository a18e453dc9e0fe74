use crate::auth::auth::AuthUser;
use crate::model::adjustment::{Adjustment, NewAdjustment};
use crate::model::attendance::AttendanceEntry;
use crate::service::attendance::{self as policy, CheckOutDetails, Correction, CurrentSession};
use crate::service::report::{self, ReportRange};
use crate::state::AppState;
use crate::timekeeping::aggregate::RangeSummary;
use crate::timekeeping::consolidate::ConsolidatedDay;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema, Default)]
pub struct CheckInRequest {
    /// Reference to the uploaded selfie or photo
    #[schema(example = "uploads/2026-01-05/1001.jpg")]
    pub photo_proof: Option<String>,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct CheckOutRequest {
    #[schema(example = "Finished the onboarding checklist")]
    pub work_documentation: Option<String>,
    #[schema(example = json!(["uploads/report.pdf"]))]
    pub attachments: Option<Vec<String>>,
}

#[derive(Deserialize, ToSchema)]
pub struct AdjustmentRequest {
    #[schema(example = 1001)]
    pub person_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Signed; negative removes time
    #[schema(example = 30)]
    pub minutes: i64,
    #[schema(example = "Offsite client visit")]
    pub note: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CorrectionRequest {
    /// 24-hour or 12-hour clock
    #[schema(example = "5:00 PM")]
    pub time_out: Option<String>,
    #[schema(example = "19:00")]
    pub ot_time_in: Option<String>,
    #[schema(example = "21:30")]
    pub ot_time_out: Option<String>,
    pub work_documentation: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    /// Person to report on. Defaults to yourself; HR/Admin may omit it to get everyone
    #[param(example = 1001)]
    pub person_id: Option<u64>,
    /// Inclusive start date
    #[param(value_type = Option<String>, example = "2026-01-01")]
    pub from: Option<NaiveDate>,
    /// Inclusive end date
    #[param(value_type = Option<String>, example = "2026-01-31")]
    pub to: Option<NaiveDate>,
}

impl RangeQuery {
    fn resolve(&self, auth: &AuthUser) -> actix_web::Result<ReportRange> {
        Ok(ReportRange {
            person_id: auth.scope(self.person_id)?,
            from: self.from,
            to: self.to,
        })
    }
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body(
        content = CheckInRequest,
        description = "Optional photo proof",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceEntry),
        (status = 400, description = "Outside the check-in windows", body = Object, example = json!({
            "code": "outside_check_in_window",
            "message": "Check-in is not open at 12:20"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile or overtime not approved"),
        (status = 409, description = "Open session, session already used, or daily limit reached", body = Object, example = json!({
            "code": "must_check_out_first",
            "message": "You must check out of your open session first"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: Option<web::Json<CheckInRequest>>,
) -> actix_web::Result<impl Responder> {
    let person_id = auth.person_id()?;
    let photo_proof = payload.and_then(|p| p.into_inner().photo_proof);

    let entry = policy::check_in(
        state.attendance.as_ref(),
        &state.approvals,
        person_id,
        state.clock.now(),
        photo_proof,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked in successfully",
        "data": entry
    })))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body(
        content = CheckOutRequest,
        description = "Work documentation for the session",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceEntry),
        (status = 400, description = "No open session or checkout not open yet", body = Object, example = json!({
            "code": "checkout_too_early",
            "message": "Checkout for the Morning session opens at 12:00"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: Option<web::Json<CheckOutRequest>>,
) -> actix_web::Result<impl Responder> {
    let person_id = auth.person_id()?;
    let payload = payload.map(web::Json::into_inner).unwrap_or_default();

    let entry = policy::check_out(
        state.attendance.as_ref(),
        person_id,
        state.clock.now(),
        CheckOutDetails {
            work_documentation: payload.work_documentation,
            attachments: payload.attachments.unwrap_or_default(),
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked out successfully",
        "data": entry
    })))
}

/// Currently open session, if any
#[utoipa::path(
    get,
    path = "/api/attendance/current",
    responses(
        (status = 200, description = "Open session with checkout readiness, or null", body = CurrentSession),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn current(
    auth: AuthUser,
    state: web::Data<AppState>,
) -> actix_web::Result<impl Responder> {
    let person_id = auth.person_id()?;
    let current =
        policy::current_session(state.attendance.as_ref(), person_id, state.clock.now()).await?;

    Ok(HttpResponse::Ok().json(json!({ "data": current })))
}

/// Per-day consolidated attendance
#[utoipa::path(
    get,
    path = "/api/attendance/daily",
    params(RangeQuery),
    responses(
        (status = 200, description = "One record per person-day, newest first", body = [ConsolidatedDay]),
        (status = 400, description = "Start date after end date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn daily(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    let range = query.resolve(&auth)?;
    let days = report::daily(state.attendance.as_ref(), range).await?;

    Ok(HttpResponse::Ok().json(days))
}

/// Range summary with worked hours
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(RangeQuery),
    responses(
        (status = 200, description = "One summary per person", body = [RangeSummary]),
        (status = 400, description = "Start date after end date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn summary(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    let range = query.resolve(&auth)?;
    let summaries =
        report::summaries(state.attendance.as_ref(), state.adjustments.as_ref(), range).await?;

    Ok(HttpResponse::Ok().json(summaries))
}

/// Record a manual worked-time adjustment (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/attendance/adjustments",
    request_body(
        content = AdjustmentRequest,
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Adjustment recorded", body = Adjustment),
        (status = 400, description = "Zero minutes or empty note"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn add_adjustment(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<AdjustmentRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor()?;
    let payload = payload.into_inner();

    let saved = report::add_adjustment(
        state.adjustments.as_ref(),
        NewAdjustment {
            person_id: payload.person_id,
            date: payload.date,
            minutes: payload.minutes,
            note: payload.note.trim().to_string(),
            created_by: auth.user_id,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(saved))
}

/// Correct an entry's checkout or overtime markers (HR/Admin)
#[utoipa::path(
    patch,
    path = "/api/attendance/{entry_id}",
    params(
        ("entry_id" = u64, Path, description = "ID of the attendance entry to correct")
    ),
    request_body(
        content = CorrectionRequest,
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Entry corrected; status and deductions are unchanged", body = AttendanceEntry),
        (status = 400, description = "Unreadable time or nothing to update"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only"),
        (status = 404, description = "Attendance entry not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn correct_entry(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    payload: web::Json<CorrectionRequest>,
) -> actix_web::Result<impl Responder> {
    auth.require_supervisor()?;
    let payload = payload.into_inner();

    let entry = policy::correct_entry(
        state.attendance.as_ref(),
        path.into_inner(),
        Correction {
            time_out: payload.time_out,
            ot_time_in: payload.ot_time_in,
            ot_time_out: payload.ot_time_out,
            work_documentation: payload.work_documentation,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(entry))
}
