use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::timekeeping::session::classify_time_in;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
    EnumString, ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum Session {
    Morning,
    Afternoon,
    Overtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[serde(rename = "On-Time")]
    #[strum(serialize = "On-Time")]
    OnTime,
    Late,
}

/// One check-in event. `status`, `late_minutes` and `late_deduction_hours`
/// are written at check-in and never revised.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceEntry {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1001)]
    pub person_id: u64,
    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "08:02:00")]
    pub time_in: String,
    #[schema(example = "12:00:00", nullable = true)]
    pub time_out: Option<String>,
    pub status: AttendanceStatus,
    #[schema(example = 0)]
    pub late_minutes: u32,
    #[schema(example = 0)]
    pub late_deduction_hours: u32,
    /// Credited minutes, stored at checkout.
    #[schema(example = 240, nullable = true)]
    pub worked_minutes: Option<u32>,
    pub photo_proof: Option<String>,
    pub work_documentation: Option<String>,
    pub attachments: Vec<String>,
    pub ot_time_in: Option<String>,
    pub ot_time_out: Option<String>,
}

impl AttendanceEntry {
    /// Derived every time; never stored.
    pub fn session(&self) -> Option<Session> {
        classify_time_in(&self.time_in)
    }

    pub fn is_open(&self) -> bool {
        self.time_out.is_none()
    }
}

/// Insert payload; the store assigns `id`.
#[derive(Debug, Clone)]
pub struct NewAttendance {
    pub person_id: u64,
    pub date: NaiveDate,
    pub time_in: String,
    pub status: AttendanceStatus,
    pub late_minutes: u32,
    pub late_deduction_hours: u32,
    pub photo_proof: Option<String>,
}

/// Fields that may change after check-in. Status and deductions are absent
/// on purpose: they cannot be patched.
#[derive(Debug, Clone, Default)]
pub struct AttendancePatch {
    pub time_out: Option<String>,
    pub worked_minutes: Option<u32>,
    pub work_documentation: Option<String>,
    pub attachments: Option<Vec<String>>,
    pub ot_time_in: Option<String>,
    pub ot_time_out: Option<String>,
}

impl AttendancePatch {
    pub fn is_empty(&self) -> bool {
        self.time_out.is_none()
            && self.worked_minutes.is_none()
            && self.work_documentation.is_none()
            && self.attachments.is_none()
            && self.ot_time_in.is_none()
            && self.ot_time_out.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub entry_id: Option<u64>,
    pub person_id: Option<u64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub open_only: bool,
}

impl AttendanceFilter {
    pub fn entry(entry_id: u64) -> Self {
        Self {
            entry_id: Some(entry_id),
            ..Default::default()
        }
    }

    pub fn open_for(person_id: u64) -> Self {
        Self {
            person_id: Some(person_id),
            open_only: true,
            ..Default::default()
        }
    }

    pub fn on_date(person_id: u64, date: NaiveDate) -> Self {
        Self {
            person_id: Some(person_id),
            from: Some(date),
            to: Some(date),
            ..Default::default()
        }
    }

    pub fn matches(&self, entry: &AttendanceEntry) -> bool {
        self.entry_id.is_none_or(|id| id == entry.id)
            && self.person_id.is_none_or(|p| p == entry.person_id)
            && self.from.is_none_or(|d| entry.date >= d)
            && self.to.is_none_or(|d| entry.date <= d)
            && (!self.open_only || entry.is_open())
    }
}
