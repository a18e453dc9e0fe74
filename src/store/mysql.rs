use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, MySqlPool};

use super::{AdjustmentStore, AttendanceStore, OvertimeStore, StoreResult};
use crate::error::StoreError;
use crate::model::adjustment::{Adjustment, NewAdjustment};
use crate::model::attendance::{
    AttendanceEntry, AttendanceFilter, AttendancePatch, AttendanceStatus, NewAttendance,
};
use crate::model::overtime::{NewOvertimeRequest, OvertimeFilter, OvertimeRequest, OvertimeStatus};
use crate::utils::db_utils::{SqlValue, build_update_sql, execute_update};

const ATTENDANCE_COLUMNS: &str = r#"
    id, person_id, date, time_in, time_out, status, late_minutes,
    late_deduction_hours, worked_minutes, photo_proof, work_documentation,
    attachments, ot_time_in, ot_time_out
"#;

const OVERTIME_COLUMNS: &str = "id, person_id, date, reason, status, decided_by";

const ADJUSTMENT_COLUMNS: &str = "id, person_id, date, minutes, note, created_by";

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
    Str(String),
}

#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    person_id: u64,
    date: NaiveDate,
    time_in: String,
    time_out: Option<String>,
    status: String,
    late_minutes: u32,
    late_deduction_hours: u32,
    worked_minutes: Option<u32>,
    photo_proof: Option<String>,
    work_documentation: Option<String>,
    attachments: Option<String>,
    ot_time_in: Option<String>,
    ot_time_out: Option<String>,
}

impl TryFrom<AttendanceRow> for AttendanceEntry {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<AttendanceStatus>()
            .map_err(|_| StoreError::Corrupt {
                message: format!("attendance {} has status {:?}", row.id, row.status),
            })?;

        let attachments = match row.attachments.as_deref() {
            None | Some("") => Vec::new(),
            Some(raw) => serde_json::from_str(raw).map_err(|e| StoreError::Corrupt {
                message: format!("attendance {} attachments: {}", row.id, e),
            })?,
        };

        Ok(AttendanceEntry {
            id: row.id,
            person_id: row.person_id,
            date: row.date,
            time_in: row.time_in,
            time_out: row.time_out,
            status,
            late_minutes: row.late_minutes,
            late_deduction_hours: row.late_deduction_hours,
            worked_minutes: row.worked_minutes,
            photo_proof: row.photo_proof,
            work_documentation: row.work_documentation,
            attachments,
            ot_time_in: row.ot_time_in,
            ot_time_out: row.ot_time_out,
        })
    }
}

#[derive(FromRow)]
struct OvertimeRow {
    id: u64,
    person_id: u64,
    date: NaiveDate,
    reason: String,
    status: String,
    decided_by: Option<u64>,
}

impl TryFrom<OvertimeRow> for OvertimeRequest {
    type Error = StoreError;

    fn try_from(row: OvertimeRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OvertimeStatus>()
            .map_err(|_| StoreError::Corrupt {
                message: format!("overtime request {} has status {:?}", row.id, row.status),
            })?;

        Ok(OvertimeRequest {
            id: row.id,
            person_id: row.person_id,
            date: row.date,
            reason: row.reason,
            status,
            decided_by: row.decided_by,
        })
    }
}

#[derive(FromRow)]
struct AdjustmentRow {
    id: u64,
    person_id: u64,
    date: NaiveDate,
    minutes: i64,
    note: String,
    created_by: u64,
}

impl From<AdjustmentRow> for Adjustment {
    fn from(row: AdjustmentRow) -> Self {
        Adjustment {
            id: row.id,
            person_id: row.person_id,
            date: row.date,
            minutes: row.minutes,
            note: row.note,
            created_by: row.created_by,
        }
    }
}

fn patch_assignments(patch: AttendancePatch) -> StoreResult<Vec<(&'static str, SqlValue)>> {
    let mut assignments = Vec::new();

    if let Some(v) = patch.time_out {
        assignments.push(("time_out", SqlValue::String(v)));
    }
    if let Some(v) = patch.worked_minutes {
        assignments.push(("worked_minutes", SqlValue::U32(v)));
    }
    if let Some(v) = patch.work_documentation {
        assignments.push(("work_documentation", SqlValue::String(v)));
    }
    if let Some(v) = patch.attachments {
        let encoded = serde_json::to_string(&v).map_err(|e| StoreError::Corrupt {
            message: format!("attachments: {}", e),
        })?;
        assignments.push(("attachments", SqlValue::String(encoded)));
    }
    if let Some(v) = patch.ot_time_in {
        assignments.push(("ot_time_in", SqlValue::String(v)));
    }
    if let Some(v) = patch.ot_time_out {
        assignments.push(("ot_time_out", SqlValue::String(v)));
    }

    Ok(assignments)
}

/// sqlx-backed collaborator over the tables in `migrations/`.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_attendance(&self, id: u64) -> StoreResult<Option<AttendanceEntry>> {
        let sql = format!("SELECT {} FROM attendance WHERE id = ?", ATTENDANCE_COLUMNS);

        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(AttendanceEntry::try_from).transpose()
    }

    async fn fetch_overtime(&self, id: u64) -> StoreResult<Option<OvertimeRequest>> {
        let sql = format!("SELECT {} FROM overtime_requests WHERE id = ?", OVERTIME_COLUMNS);

        let row = sqlx::query_as::<_, OvertimeRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(OvertimeRequest::try_from).transpose()
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn list_attendance(
        &self,
        filter: &AttendanceFilter,
    ) -> StoreResult<Vec<AttendanceEntry>> {
        // -------------------------
        // WHERE clause
        // -------------------------
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(entry_id) = filter.entry_id {
            where_sql.push_str(" AND id = ?");
            args.push(FilterValue::U64(entry_id));
        }
        if let Some(person_id) = filter.person_id {
            where_sql.push_str(" AND person_id = ?");
            args.push(FilterValue::U64(person_id));
        }
        if let Some(from) = filter.from {
            where_sql.push_str(" AND date >= ?");
            args.push(FilterValue::Date(from));
        }
        if let Some(to) = filter.to {
            where_sql.push_str(" AND date <= ?");
            args.push(FilterValue::Date(to));
        }
        if filter.open_only {
            where_sql.push_str(" AND time_out IS NULL");
        }

        let sql = format!(
            "SELECT {} FROM attendance{} ORDER BY date ASC, id ASC",
            ATTENDANCE_COLUMNS, where_sql
        );

        let mut query = sqlx::query_as::<_, AttendanceRow>(&sql);
        for arg in args {
            query = match arg {
                FilterValue::U64(v) => query.bind(v),
                FilterValue::Date(d) => query.bind(d),
                FilterValue::Str(s) => query.bind(s),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(AttendanceEntry::try_from).collect()
    }

    async fn insert_attendance(&self, entry: NewAttendance) -> StoreResult<AttendanceEntry> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance
                (person_id, date, time_in, status, late_minutes, late_deduction_hours, photo_proof)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.person_id)
        .bind(entry.date)
        .bind(&entry.time_in)
        .bind(entry.status.to_string())
        .bind(entry.late_minutes)
        .bind(entry.late_deduction_hours)
        .bind(&entry.photo_proof)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        self.fetch_attendance(id).await?.ok_or_else(|| StoreError::Corrupt {
            message: format!("attendance {} vanished after insert", id),
        })
    }

    async fn update_attendance(
        &self,
        id: u64,
        patch: AttendancePatch,
    ) -> StoreResult<Option<AttendanceEntry>> {
        if let Some(update) = build_update_sql("attendance", patch_assignments(patch)?, "id", id) {
            execute_update(&self.pool, update).await?;
        }
        self.fetch_attendance(id).await
    }
}

#[async_trait]
impl OvertimeStore for MySqlStore {
    async fn create_overtime_request(
        &self,
        request: NewOvertimeRequest,
    ) -> StoreResult<OvertimeRequest> {
        let result = sqlx::query(
            r#"
            INSERT INTO overtime_requests (person_id, date, reason, status)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(request.person_id)
        .bind(request.date)
        .bind(&request.reason)
        .bind(OvertimeStatus::Pending.to_string())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_id();
        self.fetch_overtime(id).await?.ok_or_else(|| StoreError::Corrupt {
            message: format!("overtime request {} vanished after insert", id),
        })
    }

    async fn list_overtime_requests(
        &self,
        filter: &OvertimeFilter,
    ) -> StoreResult<Vec<OvertimeRequest>> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(person_id) = filter.person_id {
            where_sql.push_str(" AND person_id = ?");
            args.push(FilterValue::U64(person_id));
        }
        if let Some(date) = filter.date {
            where_sql.push_str(" AND date = ?");
            args.push(FilterValue::Date(date));
        }
        if let Some(status) = filter.status {
            where_sql.push_str(" AND status = ?");
            args.push(FilterValue::Str(status.to_string()));
        }

        let sql = format!(
            "SELECT {} FROM overtime_requests{} ORDER BY date DESC, id DESC",
            OVERTIME_COLUMNS, where_sql
        );

        let mut query = sqlx::query_as::<_, OvertimeRow>(&sql);
        for arg in args {
            query = match arg {
                FilterValue::U64(v) => query.bind(v),
                FilterValue::Date(d) => query.bind(d),
                FilterValue::Str(s) => query.bind(s),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(OvertimeRequest::try_from).collect()
    }

    async fn decide_overtime_request(
        &self,
        id: u64,
        decision: OvertimeStatus,
        decided_by: u64,
    ) -> StoreResult<Option<OvertimeRequest>> {
        let result = sqlx::query(
            r#"
            UPDATE overtime_requests
            SET status = ?, decided_by = ?
            WHERE id = ?
            AND status = 'pending'
            "#,
        )
        .bind(decision.to_string())
        .bind(decided_by)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.fetch_overtime(id).await
    }

    async fn is_overtime_approved(&self, person_id: u64, date: NaiveDate) -> StoreResult<bool> {
        let approved = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM overtime_requests
                WHERE person_id = ? AND date = ? AND status = 'approved'
            )
            "#,
        )
        .bind(person_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        Ok(approved > 0)
    }
}

#[async_trait]
impl AdjustmentStore for MySqlStore {
    async fn add_adjustment(&self, adjustment: NewAdjustment) -> StoreResult<Adjustment> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_adjustments (person_id, date, minutes, note, created_by)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(adjustment.person_id)
        .bind(adjustment.date)
        .bind(adjustment.minutes)
        .bind(&adjustment.note)
        .bind(adjustment.created_by)
        .execute(&self.pool)
        .await?;

        Ok(Adjustment {
            id: result.last_insert_id(),
            person_id: adjustment.person_id,
            date: adjustment.date,
            minutes: adjustment.minutes,
            note: adjustment.note,
            created_by: adjustment.created_by,
        })
    }

    async fn list_adjustments(
        &self,
        person_id: Option<u64>,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> StoreResult<Vec<Adjustment>> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(person_id) = person_id {
            where_sql.push_str(" AND person_id = ?");
            args.push(FilterValue::U64(person_id));
        }
        if let Some(from) = from {
            where_sql.push_str(" AND date >= ?");
            args.push(FilterValue::Date(from));
        }
        if let Some(to) = to {
            where_sql.push_str(" AND date <= ?");
            args.push(FilterValue::Date(to));
        }

        let sql = format!(
            "SELECT {} FROM attendance_adjustments{} ORDER BY date ASC, id ASC",
            ADJUSTMENT_COLUMNS, where_sql
        );

        let mut query = sqlx::query_as::<_, AdjustmentRow>(&sql);
        for arg in args {
            query = match arg {
                FilterValue::U64(v) => query.bind(v),
                FilterValue::Date(d) => query.bind(d),
                FilterValue::Str(s) => query.bind(s),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Adjustment::from).collect())
    }
}
