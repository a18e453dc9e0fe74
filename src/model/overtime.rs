use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OvertimeStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OvertimeRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub person_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "Release night")]
    pub reason: String,
    pub status: OvertimeStatus,
    #[schema(nullable = true)]
    pub decided_by: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NewOvertimeRequest {
    pub person_id: u64,
    pub date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct OvertimeFilter {
    pub person_id: Option<u64>,
    pub date: Option<NaiveDate>,
    pub status: Option<OvertimeStatus>,
}

impl OvertimeFilter {
    pub fn matches(&self, request: &OvertimeRequest) -> bool {
        self.person_id.is_none_or(|p| p == request.person_id)
            && self.date.is_none_or(|d| d == request.date)
            && self.status.is_none_or(|s| s == request.status)
    }
}
