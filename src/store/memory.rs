use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{AdjustmentStore, AttendanceStore, OvertimeStore, StoreResult};
use crate::error::StoreError;
use crate::model::adjustment::{Adjustment, NewAdjustment};
use crate::model::attendance::{AttendanceEntry, AttendanceFilter, AttendancePatch, NewAttendance};
use crate::model::overtime::{NewOvertimeRequest, OvertimeFilter, OvertimeRequest, OvertimeStatus};

/// In-process store with the same open-session uniqueness as the MySQL
/// schema.
#[derive(Default)]
pub struct MemoryStore {
    attendance: Mutex<Vec<AttendanceEntry>>,
    overtime: Mutex<Vec<OvertimeRequest>>,
    adjustments: Mutex<Vec<Adjustment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a row as if it had been written earlier.
    pub fn push_attendance(&self, mut entry: AttendanceEntry) -> AttendanceEntry {
        let mut rows = self.attendance.lock().unwrap();
        entry.id = rows.len() as u64 + 1;
        rows.push(entry.clone());
        entry
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> StoreResult<Vec<AttendanceEntry>> {
        let rows = self.attendance.lock().unwrap();
        let mut out: Vec<_> = rows.iter().filter(|e| filter.matches(e)).cloned().collect();
        out.sort_by_key(|e| (e.date, e.id));
        Ok(out)
    }

    async fn insert_attendance(&self, entry: NewAttendance) -> StoreResult<AttendanceEntry> {
        let mut rows = self.attendance.lock().unwrap();
        if rows.iter().any(|e| e.person_id == entry.person_id && e.is_open()) {
            return Err(StoreError::Conflict);
        }

        let row = AttendanceEntry {
            id: rows.len() as u64 + 1,
            person_id: entry.person_id,
            date: entry.date,
            time_in: entry.time_in,
            time_out: None,
            status: entry.status,
            late_minutes: entry.late_minutes,
            late_deduction_hours: entry.late_deduction_hours,
            worked_minutes: None,
            photo_proof: entry.photo_proof,
            work_documentation: None,
            attachments: Vec::new(),
            ot_time_in: None,
            ot_time_out: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn update_attendance(
        &self,
        id: u64,
        patch: AttendancePatch,
    ) -> StoreResult<Option<AttendanceEntry>> {
        let mut rows = self.attendance.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };

        if patch.time_out.is_some() {
            row.time_out = patch.time_out;
        }
        if patch.worked_minutes.is_some() {
            row.worked_minutes = patch.worked_minutes;
        }
        if patch.work_documentation.is_some() {
            row.work_documentation = patch.work_documentation;
        }
        if let Some(attachments) = patch.attachments {
            row.attachments = attachments;
        }
        if patch.ot_time_in.is_some() {
            row.ot_time_in = patch.ot_time_in;
        }
        if patch.ot_time_out.is_some() {
            row.ot_time_out = patch.ot_time_out;
        }
        Ok(Some(row.clone()))
    }
}

#[async_trait]
impl OvertimeStore for MemoryStore {
    async fn create_overtime_request(
        &self,
        request: NewOvertimeRequest,
    ) -> StoreResult<OvertimeRequest> {
        let mut rows = self.overtime.lock().unwrap();
        let row = OvertimeRequest {
            id: rows.len() as u64 + 1,
            person_id: request.person_id,
            date: request.date,
            reason: request.reason,
            status: OvertimeStatus::Pending,
            decided_by: None,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_overtime_requests(
        &self,
        filter: &OvertimeFilter,
    ) -> StoreResult<Vec<OvertimeRequest>> {
        let rows = self.overtime.lock().unwrap();
        Ok(rows.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn decide_overtime_request(
        &self,
        id: u64,
        decision: OvertimeStatus,
        decided_by: u64,
    ) -> StoreResult<Option<OvertimeRequest>> {
        let mut rows = self.overtime.lock().unwrap();
        match rows
            .iter_mut()
            .find(|r| r.id == id && r.status == OvertimeStatus::Pending)
        {
            Some(row) => {
                row.status = decision;
                row.decided_by = Some(decided_by);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn is_overtime_approved(&self, person_id: u64, date: NaiveDate) -> StoreResult<bool> {
        let rows = self.overtime.lock().unwrap();
        Ok(rows.iter().any(|r| {
            r.person_id == person_id && r.date == date && r.status == OvertimeStatus::Approved
        }))
    }
}

#[async_trait]
impl AdjustmentStore for MemoryStore {
    async fn add_adjustment(&self, adjustment: NewAdjustment) -> StoreResult<Adjustment> {
        let mut rows = self.adjustments.lock().unwrap();
        let row = Adjustment {
            id: rows.len() as u64 + 1,
            person_id: adjustment.person_id,
            date: adjustment.date,
            minutes: adjustment.minutes,
            note: adjustment.note,
            created_by: adjustment.created_by,
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn list_adjustments(
        &self,
        person_id: Option<u64>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Adjustment>> {
        let rows = self.adjustments.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|a| person_id.is_none_or(|p| p == a.person_id))
            .filter(|a| from.is_none_or(|d| a.date >= d))
            .filter(|a| to.is_none_or(|d| a.date <= d))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;

    fn opening(person_id: u64, time_in: &str) -> NewAttendance {
        NewAttendance {
            person_id,
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            time_in: time_in.into(),
            status: AttendanceStatus::OnTime,
            late_minutes: 0,
            late_deduction_hours: 0,
            photo_proof: None,
        }
    }

    #[actix_web::test]
    async fn second_open_entry_for_a_person_conflicts() {
        let store = MemoryStore::new();
        let first = store.insert_attendance(opening(7, "08:00:00")).await.unwrap();

        let err = store.insert_attendance(opening(7, "13:00:00")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));

        // other people are unaffected
        store.insert_attendance(opening(8, "08:00:00")).await.unwrap();

        let patch = AttendancePatch {
            time_out: Some("12:00:00".into()),
            ..Default::default()
        };
        store.update_attendance(first.id, patch).await.unwrap();
        store.insert_attendance(opening(7, "13:00:00")).await.unwrap();
    }
}
