use std::sync::Arc;
use std::time::Duration;

use crate::service::overtime::OvertimeApprovals;
use crate::store::{AdjustmentStore, AttendanceStore, OvertimeStore};
use crate::timekeeping::clock::Clock;

/// Shared handler state. One store usually backs all three traits.
#[derive(Clone)]
pub struct AppState {
    pub attendance: Arc<dyn AttendanceStore>,
    pub overtime: Arc<dyn OvertimeStore>,
    pub adjustments: Arc<dyn AdjustmentStore>,
    pub approvals: OvertimeApprovals,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>, approval_ttl: Duration) -> Self
    where
        S: AttendanceStore + OvertimeStore + AdjustmentStore + 'static,
    {
        let overtime: Arc<dyn OvertimeStore> = store.clone();
        Self {
            attendance: store.clone(),
            adjustments: store,
            approvals: OvertimeApprovals::new(overtime.clone(), approval_ttl),
            overtime,
            clock,
        }
    }
}
