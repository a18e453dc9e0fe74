use crate::api::attendance::{AdjustmentRequest, CheckInRequest, CheckOutRequest, CorrectionRequest};
use crate::api::overtime::CreateOvertime;
use crate::model::adjustment::Adjustment;
use crate::model::attendance::{AttendanceEntry, AttendanceStatus, Session};
use crate::model::overtime::{OvertimeRequest, OvertimeStatus};
use crate::service::attendance::CurrentSession;
use crate::timekeeping::aggregate::RangeSummary;
use crate::timekeeping::consolidate::{ConsolidatedDay, SessionSlot};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance Portal API",
        version = "1.0.0",
        description = r#"
## Intern & Employee Attendance

Session-based timekeeping for interns and employees.

### 🔹 Key Features
- **Check-in / Check-out**
  - Morning (05:00-12:00), afternoon (12:40-17:00) and approved overtime (18:50-22:00) sessions
  - Lateness and hour deductions frozen at check-in
- **Daily view**
  - One record per person-day with morning, afternoon and overtime slots
- **Summaries**
  - Worked hours over a date range, including manual HR adjustments
- **Overtime requests**
  - Request, approve and reject evening sessions

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.
Employees and interns only see their own records; **HR** and **Admin** see everyone's.

All clock times are in the business timezone.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::current,
        crate::api::attendance::daily,
        crate::api::attendance::summary,
        crate::api::attendance::add_adjustment,
        crate::api::attendance::correct_entry,

        crate::api::overtime::create_overtime,
        crate::api::overtime::overtime_list,
        crate::api::overtime::approve_overtime,
        crate::api::overtime::reject_overtime
    ),
    components(
        schemas(
            Session,
            AttendanceStatus,
            AttendanceEntry,
            CheckInRequest,
            CheckOutRequest,
            CurrentSession,
            SessionSlot,
            ConsolidatedDay,
            RangeSummary,
            Adjustment,
            AdjustmentRequest,
            CorrectionRequest,
            OvertimeStatus,
            OvertimeRequest,
            CreateOvertime
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Check-in, check-out and reporting APIs"),
        (name = "Overtime", description = "Overtime request APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
