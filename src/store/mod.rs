//! Persistence collaborator. The engine only needs list/insert/update
//! semantics from it; the MySQL implementation backs the running service and
//! the in-memory one backs tests.
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::adjustment::{Adjustment, NewAdjustment};
use crate::model::attendance::{AttendanceEntry, AttendanceFilter, AttendancePatch, NewAttendance};
use crate::model::overtime::{NewOvertimeRequest, OvertimeFilter, OvertimeRequest, OvertimeStatus};

pub mod mysql;

#[cfg(test)]
pub mod memory;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    /// Entries matching `filter`, oldest date first.
    async fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> StoreResult<Vec<AttendanceEntry>>;

    /// Assigns identity. Fails with `StoreError::Conflict` when the person
    /// already has an open entry.
    async fn insert_attendance(&self, entry: NewAttendance) -> StoreResult<AttendanceEntry>;

    /// `None` when no row has that id.
    async fn update_attendance(
        &self,
        id: u64,
        patch: AttendancePatch,
    ) -> StoreResult<Option<AttendanceEntry>>;
}

#[async_trait]
pub trait OvertimeStore: Send + Sync {
    async fn create_overtime_request(
        &self,
        request: NewOvertimeRequest,
    ) -> StoreResult<OvertimeRequest>;

    async fn list_overtime_requests(
        &self,
        filter: &OvertimeFilter,
    ) -> StoreResult<Vec<OvertimeRequest>>;

    /// Moves a pending request to `decision`. `None` when the request does
    /// not exist or was already decided.
    async fn decide_overtime_request(
        &self,
        id: u64,
        decision: OvertimeStatus,
        decided_by: u64,
    ) -> StoreResult<Option<OvertimeRequest>>;

    async fn is_overtime_approved(&self, person_id: u64, date: NaiveDate) -> StoreResult<bool>;
}

#[async_trait]
pub trait AdjustmentStore: Send + Sync {
    async fn add_adjustment(&self, adjustment: NewAdjustment) -> StoreResult<Adjustment>;

    async fn list_adjustments(
        &self,
        person_id: Option<u64>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Adjustment>>;
}
