use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceEntry, AttendanceStatus, Session};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionSlot {
    #[schema(example = "08:02:00")]
    pub time_in: String,
    #[schema(example = "12:00:00", nullable = true)]
    pub time_out: Option<String>,
    pub status: AttendanceStatus,
    pub deduction_hours: u32,
    pub late_minutes: u32,
}

/// One person-day, rebuilt on every read.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConsolidatedDay {
    pub person_id: u64,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub morning: Option<SessionSlot>,
    pub afternoon: Option<SessionSlot>,
    pub overtime: Option<SessionSlot>,
    pub overall_status: AttendanceStatus,
    pub total_deduction: u32,
    pub photo_proof: Option<String>,
    pub work_documentation: Option<String>,
    pub attachments: Vec<String>,
}

impl ConsolidatedDay {
    fn empty(person_id: u64, date: NaiveDate) -> Self {
        Self {
            person_id,
            date,
            morning: None,
            afternoon: None,
            overtime: None,
            overall_status: AttendanceStatus::OnTime,
            total_deduction: 0,
            photo_proof: None,
            work_documentation: None,
            attachments: Vec::new(),
        }
    }

    fn slot_mut(&mut self, session: Session) -> &mut Option<SessionSlot> {
        match session {
            Session::Morning => &mut self.morning,
            Session::Afternoon => &mut self.afternoon,
            Session::Overtime => &mut self.overtime,
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = &SessionSlot> {
        [&self.morning, &self.afternoon, &self.overtime]
            .into_iter()
            .flatten()
    }

    fn finish(&mut self) {
        self.overall_status = if self.slots().any(|s| s.status == AttendanceStatus::Late) {
            AttendanceStatus::Late
        } else {
            AttendanceStatus::OnTime
        };
        self.total_deduction = self.slots().map(|s| s.deduction_hours).sum();
    }
}

impl From<&AttendanceEntry> for SessionSlot {
    fn from(entry: &AttendanceEntry) -> Self {
        Self {
            time_in: entry.time_in.clone(),
            time_out: entry.time_out.clone(),
            status: entry.status,
            deduction_hours: entry.late_deduction_hours,
            late_minutes: entry.late_minutes,
        }
    }
}

/// Fold raw entries into one record per `(person_id, date)`, newest date
/// first. Documentation fields are last-write-wins in input order.
pub fn consolidate(entries: &[AttendanceEntry]) -> Vec<ConsolidatedDay> {
    let mut days: BTreeMap<(NaiveDate, u64), ConsolidatedDay> = BTreeMap::new();

    for entry in entries {
        let day = days
            .entry((entry.date, entry.person_id))
            .or_insert_with(|| ConsolidatedDay::empty(entry.person_id, entry.date));

        match entry.session() {
            Some(session) => *day.slot_mut(session) = Some(SessionSlot::from(entry)),
            None => tracing::warn!(
                entry_id = entry.id,
                time_in = %entry.time_in,
                "Skipping unclassifiable attendance entry during consolidation"
            ),
        }

        // legacy rows carry overtime on the same record
        if day.overtime.is_none() {
            if let Some(ot_in) = entry.ot_time_in.as_ref() {
                day.overtime = Some(SessionSlot {
                    time_in: ot_in.clone(),
                    time_out: entry.ot_time_out.clone(),
                    status: AttendanceStatus::OnTime,
                    deduction_hours: 0,
                    late_minutes: 0,
                });
            }
        }

        if entry.photo_proof.is_some() {
            day.photo_proof = entry.photo_proof.clone();
        }
        if entry.work_documentation.is_some() {
            day.work_documentation = entry.work_documentation.clone();
        }
        if !entry.attachments.is_empty() {
            day.attachments = entry.attachments.clone();
        }
    }

    days.into_values()
        .rev()
        .map(|mut day| {
            day.finish();
            day
        })
        .collect()
}
