use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::error::AttendanceError;
use crate::model::adjustment::{Adjustment, NewAdjustment};
use crate::model::attendance::AttendanceFilter;
use crate::store::{AdjustmentStore, AttendanceStore};
use crate::timekeeping::aggregate::{RangeSummary, aggregate, aggregate_by_person};
use crate::timekeeping::consolidate::{ConsolidatedDay, consolidate};

/// Inclusive date range, optionally narrowed to one person.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRange {
    pub person_id: Option<u64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ReportRange {
    fn validate(&self) -> Result<(), AttendanceError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(AttendanceError::invalid(format!(
                "start date {} is after end date {}",
                from, to
            ))),
            _ => Ok(()),
        }
    }

    fn filter(&self) -> AttendanceFilter {
        AttendanceFilter {
            person_id: self.person_id,
            from: self.from,
            to: self.to,
            ..Default::default()
        }
    }
}

/// Per-day view, newest first.
pub async fn daily(
    store: &dyn AttendanceStore,
    range: ReportRange,
) -> Result<Vec<ConsolidatedDay>, AttendanceError> {
    range.validate()?;
    let entries = store.list_attendance(&range.filter()).await?;
    Ok(consolidate(&entries))
}

/// Range totals. With a person in the range the result always has exactly
/// one summary, even when the person has no entries.
#[instrument(skip(store, adjustments))]
pub async fn summaries(
    store: &dyn AttendanceStore,
    adjustments: &dyn AdjustmentStore,
    range: ReportRange,
) -> Result<Vec<RangeSummary>, AttendanceError> {
    range.validate()?;

    let entries = store.list_attendance(&range.filter()).await?;
    let mut additional: BTreeMap<u64, i64> = BTreeMap::new();
    for adjustment in adjustments
        .list_adjustments(range.person_id, range.from, range.to)
        .await?
    {
        *additional.entry(adjustment.person_id).or_default() += adjustment.minutes;
    }

    Ok(match range.person_id {
        Some(person_id) => {
            let extra = additional.get(&person_id).copied().unwrap_or(0);
            vec![aggregate(&entries, person_id, extra)]
        }
        None => aggregate_by_person(&entries, &additional),
    })
}

#[instrument(skip(adjustments, adjustment), fields(person_id = adjustment.person_id))]
pub async fn add_adjustment(
    adjustments: &dyn AdjustmentStore,
    adjustment: NewAdjustment,
) -> Result<Adjustment, AttendanceError> {
    if adjustment.minutes == 0 {
        return Err(AttendanceError::invalid("minutes must not be zero"));
    }
    if adjustment.note.trim().is_empty() {
        return Err(AttendanceError::invalid("note must not be empty"));
    }

    let saved = adjustments.add_adjustment(adjustment).await?;
    info!(minutes = saved.minutes, "Adjustment recorded");
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::{AttendanceEntry, AttendanceStatus};
    use crate::store::memory::MemoryStore;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn closed(
        person_id: u64,
        day: u32,
        time_in: &str,
        time_out: &str,
        late_minutes: u32,
    ) -> AttendanceEntry {
        AttendanceEntry {
            id: 0,
            person_id,
            date: date(day),
            time_in: time_in.into(),
            time_out: Some(time_out.into()),
            status: if late_minutes > 0 {
                AttendanceStatus::Late
            } else {
                AttendanceStatus::OnTime
            },
            late_minutes,
            late_deduction_hours: if late_minutes > 0 { 1 } else { 0 },
            worked_minutes: None,
            photo_proof: None,
            work_documentation: None,
            attachments: Vec::new(),
            ot_time_in: None,
            ot_time_out: None,
        }
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.push_attendance(closed(7, 2, "08:00:00", "12:00:00", 0));
        store.push_attendance(closed(7, 2, "13:00:00", "17:00:00", 0));
        store.push_attendance(closed(7, 3, "08:30:00", "12:00:00", 25));
        store.push_attendance(closed(9, 3, "08:00:00", "12:00:00", 0));
        store
    }

    fn adjustment(person_id: u64, day: u32, minutes: i64) -> NewAdjustment {
        NewAdjustment {
            person_id,
            date: date(day),
            minutes,
            note: "client visit".into(),
            created_by: 2,
        }
    }

    #[actix_web::test]
    async fn daily_view_merges_sessions_newest_first() {
        let store = seeded();
        let days = daily(
            &store,
            ReportRange {
                person_id: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(3));
        assert_eq!(days[0].overall_status, AttendanceStatus::Late);
        assert!(days[1].morning.is_some() && days[1].afternoon.is_some());
    }

    #[actix_web::test]
    async fn person_summary_includes_adjustments_in_range() {
        let store = seeded();
        add_adjustment(&store, adjustment(7, 3, 30)).await.unwrap();
        add_adjustment(&store, adjustment(7, 20, 500)).await.unwrap();

        let result = summaries(
            &store,
            &store,
            ReportRange {
                person_id: Some(7),
                from: Some(date(1)),
                to: Some(date(10)),
            },
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        let summary = &result[0];
        assert_eq!(summary.total_days, 2);
        assert_eq!(summary.late_days, 1);
        assert_eq!(summary.additional_minutes, 30);
        // 240 + 240 + 210 - 25 + 30
        assert_eq!(summary.total_worked_minutes, 695);
    }

    #[actix_web::test]
    async fn person_without_entries_still_gets_a_summary() {
        let store = seeded();
        let result = summaries(
            &store,
            &store,
            ReportRange {
                person_id: Some(42),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].total_days, 0);
    }

    #[actix_web::test]
    async fn everyone_summary_is_grouped_per_person() {
        let store = seeded();
        add_adjustment(&store, adjustment(11, 3, 60)).await.unwrap();

        let result = summaries(&store, &store, ReportRange::default()).await.unwrap();
        let ids: Vec<_> = result.iter().map(|s| s.person_id).collect();
        assert_eq!(ids, vec![7, 9, 11]);
        assert_eq!(result[1].total_worked_minutes, 240);
        assert_eq!(result[2].total_worked_minutes, 60);
    }

    #[actix_web::test]
    async fn inverted_range_is_refused() {
        let store = seeded();
        let range = ReportRange {
            person_id: None,
            from: Some(date(9)),
            to: Some(date(1)),
        };
        assert!(matches!(
            daily(&store, range).await.unwrap_err(),
            AttendanceError::InvalidRequest { .. }
        ));
        assert!(matches!(
            summaries(&store, &store, range).await.unwrap_err(),
            AttendanceError::InvalidRequest { .. }
        ));
    }

    #[actix_web::test]
    async fn empty_adjustments_are_refused() {
        let store = MemoryStore::new();
        assert!(add_adjustment(&store, adjustment(7, 3, 0)).await.is_err());

        let mut blank = adjustment(7, 3, 15);
        blank.note = "  ".into();
        assert!(add_adjustment(&store, blank).await.is_err());
    }
}
