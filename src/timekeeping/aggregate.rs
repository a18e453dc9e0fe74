use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceEntry, AttendanceStatus, Session};
use crate::timekeeping::worked::{entry_worked_minutes, marker_overtime_minutes};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RangeSummary {
    #[schema(example = 1001)]
    pub person_id: u64,
    #[schema(example = 5)]
    pub total_days: u32,
    #[schema(example = 4)]
    pub on_time_days: u32,
    #[schema(example = 1)]
    pub late_days: u32,
    #[schema(example = 25)]
    pub total_late_minutes: i64,
    #[schema(example = 2)]
    pub total_deduction_hours: i64,
    /// Manual adjustment already included in `total_worked_minutes`.
    #[schema(example = 0)]
    pub additional_minutes: i64,
    #[schema(example = 2375)]
    pub total_worked_minutes: i64,
    #[schema(example = 39.58)]
    pub total_worked_hours: f64,
}

/// Overtime credited for one day. A real overtime entry wins over the
/// markers of other rows; otherwise the first row carrying markers counts,
/// the same slot the daily view shows.
#[derive(Default)]
struct DayOvertime {
    has_entry: bool,
    markers: Option<u32>,
}

impl DayOvertime {
    fn marker_minutes(&self) -> i64 {
        if self.has_entry {
            0
        } else {
            i64::from(self.markers.unwrap_or(0))
        }
    }
}

/// Sum one person's entries.
///
/// Worked minutes are credited inside each session's baseline/cap envelope,
/// then reduced by the late minutes actually recorded, then adjusted by
/// `additional_minutes`. Deduction hours are reported apart and not
/// subtracted again.
pub fn aggregate(
    entries: &[AttendanceEntry],
    person_id: u64,
    additional_minutes: i64,
) -> RangeSummary {
    let mut overtime: BTreeMap<_, DayOvertime> = BTreeMap::new();
    let mut late_dates = BTreeSet::new();
    let mut late_minutes: i64 = 0;
    let mut deduction_hours: i64 = 0;
    let mut worked: i64 = 0;

    for entry in entries.iter().filter(|e| e.person_id == person_id) {
        let day = overtime.entry(entry.date).or_default();
        if entry.session() == Some(Session::Overtime) {
            day.has_entry = true;
        }
        if day.markers.is_none() {
            day.markers = marker_overtime_minutes(entry);
        }

        if entry.status == AttendanceStatus::Late {
            late_dates.insert(entry.date);
        }
        late_minutes += i64::from(entry.late_minutes);
        deduction_hours += i64::from(entry.late_deduction_hours);
        worked += i64::from(entry_worked_minutes(entry));
    }
    worked += overtime.values().map(DayOvertime::marker_minutes).sum::<i64>();

    let total_days = overtime.len() as u32;
    let late_days = late_dates.len() as u32;
    let total_worked_minutes = (worked - late_minutes + additional_minutes).max(0);

    RangeSummary {
        person_id,
        total_days,
        on_time_days: total_days - late_days,
        late_days,
        total_late_minutes: late_minutes,
        total_deduction_hours: deduction_hours,
        additional_minutes,
        total_worked_minutes,
        total_worked_hours: round_hours(total_worked_minutes),
    }
}

/// One summary per person present in `entries`, ordered by person id.
/// `additional` maps person id to its adjustment total.
pub fn aggregate_by_person(
    entries: &[AttendanceEntry],
    additional: &BTreeMap<u64, i64>,
) -> Vec<RangeSummary> {
    let people: BTreeSet<u64> = entries
        .iter()
        .map(|e| e.person_id)
        .chain(additional.keys().copied())
        .collect();

    people
        .into_iter()
        .map(|person_id| {
            let extra = additional.get(&person_id).copied().unwrap_or(0);
            aggregate(entries, person_id, extra)
        })
        .collect()
}

fn round_hours(minutes: i64) -> f64 {
    (minutes as f64 / 60.0 * 100.0).round() / 100.0
}
