use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Signed minutes HR adds to (or removes from) a person's worked time.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Adjustment {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub person_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = 30)]
    pub minutes: i64,
    #[schema(example = "Offsite client visit")]
    pub note: String,
    #[schema(example = 2)]
    pub created_by: u64,
}

#[derive(Debug, Clone)]
pub struct NewAdjustment {
    pub person_id: u64,
    pub date: NaiveDate,
    pub minutes: i64,
    pub note: String,
    pub created_by: u64,
}
