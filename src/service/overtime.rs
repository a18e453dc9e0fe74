use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate};
use moka::future::Cache;
use tracing::{info, instrument};

use crate::error::{AttendanceError, StoreError};
use crate::model::overtime::{NewOvertimeRequest, OvertimeFilter, OvertimeRequest, OvertimeStatus};
use crate::store::OvertimeStore;

/// Approved-overtime lookup with a short-lived cache in front of the store.
/// Only approvals are cached; a decided request never goes back to pending.
#[derive(Clone)]
pub struct OvertimeApprovals {
    store: Arc<dyn OvertimeStore>,
    cache: Cache<(u64, NaiveDate), bool>,
}

impl OvertimeApprovals {
    pub fn new(store: Arc<dyn OvertimeStore>, ttl: Duration) -> Self {
        Self {
            store,
            cache: Cache::builder()
                .max_capacity(50_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn is_approved(&self, person_id: u64, date: NaiveDate) -> Result<bool, StoreError> {
        if self.cache.get(&(person_id, date)).await.unwrap_or(false) {
            return Ok(true);
        }

        let approved = self.store.is_overtime_approved(person_id, date).await?;
        if approved {
            self.remember(person_id, date).await;
        }
        Ok(approved)
    }

    pub async fn remember(&self, person_id: u64, date: NaiveDate) {
        self.cache.insert((person_id, date), true).await;
    }
}

/// File a request for `date`, which must not be in the past.
#[instrument(skip(store, reason, now))]
pub async fn request_overtime(
    store: &dyn OvertimeStore,
    person_id: u64,
    date: NaiveDate,
    reason: String,
    now: DateTime<FixedOffset>,
) -> Result<OvertimeRequest, AttendanceError> {
    let reason = reason.trim().to_string();
    if reason.is_empty() {
        return Err(AttendanceError::invalid("reason must not be empty"));
    }
    if date < now.date_naive() {
        return Err(AttendanceError::invalid("overtime cannot be requested for a past date"));
    }

    let existing = store
        .list_overtime_requests(&OvertimeFilter {
            person_id: Some(person_id),
            date: Some(date),
            status: None,
        })
        .await?;
    if existing.iter().any(|r| r.status != OvertimeStatus::Rejected) {
        info!("Duplicate overtime request refused");
        return Err(AttendanceError::invalid(format!(
            "overtime for {} was already requested",
            date
        )));
    }

    let request = store
        .create_overtime_request(NewOvertimeRequest {
            person_id,
            date,
            reason,
        })
        .await?;

    info!(request_id = request.id, "Overtime requested");
    Ok(request)
}

/// Approve or reject a pending request.
#[instrument(skip(store, approvals))]
pub async fn decide_overtime(
    store: &dyn OvertimeStore,
    approvals: &OvertimeApprovals,
    request_id: u64,
    decision: OvertimeStatus,
    decided_by: u64,
) -> Result<OvertimeRequest, AttendanceError> {
    if decision == OvertimeStatus::Pending {
        return Err(AttendanceError::invalid("decision must be approved or rejected"));
    }

    let request = store
        .decide_overtime_request(request_id, decision, decided_by)
        .await?
        .ok_or_else(|| {
            AttendanceError::invalid("Overtime request not found or already processed")
        })?;

    if request.status == OvertimeStatus::Approved {
        approvals.remember(request.person_id, request.date).await;
    }

    info!(person_id = request.person_id, status = %request.status, "Overtime decided");
    Ok(request)
}

pub async fn list_overtime(
    store: &dyn OvertimeStore,
    filter: &OvertimeFilter,
) -> Result<Vec<OvertimeRequest>, AttendanceError> {
    Ok(store.list_overtime_requests(filter).await?)
}
