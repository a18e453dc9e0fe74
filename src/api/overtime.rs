use crate::auth::auth::AuthUser;
use crate::model::overtime::{OvertimeFilter, OvertimeRequest, OvertimeStatus};
use crate::service::overtime::{decide_overtime, list_overtime, request_overtime};
use crate::state::AppState;
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateOvertime {
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Release night")]
    pub reason: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OvertimeQuery {
    /// Filter by person. Employees and interns always see their own
    #[param(example = 1001)]
    pub person_id: Option<u64>,
    #[param(value_type = Option<String>, example = "2026-01-05")]
    pub date: Option<NaiveDate>,
    /// pending, approved or rejected
    #[param(value_type = Option<String>, example = "pending")]
    pub status: Option<String>,
}

/* =========================
Create overtime request
========================= */
#[utoipa::path(
    post,
    path = "/api/overtime",
    request_body(
        content = CreateOvertime,
        description = "Overtime request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Overtime request submitted", body = OvertimeRequest),
        (status = 400, description = "Past date, empty reason, or duplicate request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn create_overtime(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateOvertime>,
) -> actix_web::Result<impl Responder> {
    let person_id = auth.person_id()?;
    let payload = payload.into_inner();

    let request = request_overtime(
        state.overtime.as_ref(),
        person_id,
        payload.date,
        payload.reason,
        state.clock.now(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(request))
}

/* =========================
List overtime requests
========================= */
#[utoipa::path(
    get,
    path = "/api/overtime",
    params(OvertimeQuery),
    responses(
        (status = 200, description = "Overtime requests", body = [OvertimeRequest]),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn overtime_list(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<OvertimeQuery>,
) -> actix_web::Result<impl Responder> {
    let status = match query.status.as_deref() {
        Some(raw) => Some(raw.parse::<OvertimeStatus>().map_err(|_| {
            actix_web::error::ErrorBadRequest(json!({
                "message": "Invalid status. Allowed: pending, approved, rejected"
            }))
        })?),
        None => None,
    };

    let filter = OvertimeFilter {
        person_id: auth.scope(query.person_id)?,
        date: query.date,
        status,
    };
    let requests = list_overtime(state.overtime.as_ref(), &filter).await?;

    Ok(HttpResponse::Ok().json(requests))
}

async fn decide(
    auth: AuthUser,
    state: web::Data<AppState>,
    request_id: u64,
    decision: OvertimeStatus,
) -> actix_web::Result<HttpResponse> {
    auth.require_supervisor()?;

    let request = decide_overtime(
        state.overtime.as_ref(),
        &state.approvals,
        request_id,
        decision,
        auth.user_id,
    )
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Overtime {}", request.status),
        "data": request
    })))
}

/* =========================
Approve overtime request
========================= */
#[utoipa::path(
    put,
    path = "/api/overtime/{request_id}/approve",
    params(
        ("request_id" = u64, Path, description = "ID of the overtime request to approve")
    ),
    responses(
        (status = 200, description = "Overtime approved", body = Object, example = json!({
            "message": "Overtime approved"
        })),
        (status = 400, description = "Overtime request not found or already processed", body = Object, example = json!({
            "code": "invalid_request",
            "message": "Overtime request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn approve_overtime(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    decide(auth, state, path.into_inner(), OvertimeStatus::Approved).await
}

/* =========================
Reject overtime request
========================= */
#[utoipa::path(
    put,
    path = "/api/overtime/{request_id}/reject",
    params(
        ("request_id" = u64, Path, description = "ID of the overtime request to reject")
    ),
    responses(
        (status = 200, description = "Overtime rejected", body = Object, example = json!({
            "message": "Overtime rejected"
        })),
        (status = 400, description = "Overtime request not found or already processed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "HR/Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Overtime"
)]
pub async fn reject_overtime(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    decide(auth, state, path.into_inner(), OvertimeStatus::Rejected).await
}
