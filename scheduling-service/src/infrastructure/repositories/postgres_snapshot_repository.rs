use async_trait::async_trait;
use scheduling_core::domain::{
    DayType, PeriodStatus, RequestType, RoleStaffingRequirement, SchedulePeriod, ShiftSlotInfo,
    Snapshot, SolverConfig, Staff, StaffRequest, StaffingRequirement,
};
use shared::{DomainError, DomainResult};
use sqlx::{FromRow, PgPool};

use crate::domain::repositories::SnapshotRepository;

pub struct PostgresSnapshotRepository {
    pool: PgPool,
}

impl PostgresSnapshotRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn parse_day_type(raw: &str) -> Result<DayType, DomainError> {
    match raw {
        "weekday" => Ok(DayType::Weekday),
        "weekend" => Ok(DayType::Weekend),
        other => Err(DomainError::DatabaseError(format!(
            "unknown day_type '{other}'"
        ))),
    }
}

fn parse_request_kind(raw: &str) -> Result<RequestType, DomainError> {
    match raw {
        "preferred" => Ok(RequestType::Preferred),
        "unavailable" => Ok(RequestType::Unavailable),
        other => Err(DomainError::DatabaseError(format!(
            "unknown staff request kind '{other}'"
        ))),
    }
}

#[derive(FromRow)]
struct PeriodRow {
    id: i64,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    status: String,
}

#[derive(FromRow)]
struct StaffRow {
    id: i64,
    name: String,
    role: String,
    max_days_per_week: i16,
    min_days_per_week: i16,
}

#[derive(FromRow)]
struct SlotRow {
    id: i64,
    name: String,
    start_time: chrono::NaiveTime,
    end_time: chrono::NaiveTime,
}

#[derive(FromRow)]
struct RequirementRow {
    id: i64,
    shift_slot_id: i64,
    day_type: String,
    min_count: i32,
}

#[derive(FromRow)]
struct RoleRequirementRow {
    id: i64,
    shift_slot_id: i64,
    day_type: String,
    role: String,
    min_count: i32,
}

#[derive(FromRow)]
struct RequestRow {
    id: i64,
    staff_id: i64,
    date: chrono::NaiveDate,
    kind: String,
    shift_slot_id: Option<i64>,
}

#[derive(FromRow)]
struct ConfigRow {
    max_consecutive_days: i32,
    time_limit_seconds: i64,
    min_shift_interval_hours: i32,
    enable_preferred_shift: bool,
    enable_fairness: bool,
    enable_weekend_fairness: bool,
    enable_shift_interval: bool,
    enable_role_staffing: bool,
    enable_min_days_per_week: bool,
    enable_soft_staffing: bool,
    weight_preferred: f64,
    weight_fairness: f64,
    weight_weekend_fairness: f64,
    weight_soft_staffing: f64,
}

#[derive(FromRow)]
struct PrefixRow {
    staff_id: i64,
    date: chrono::NaiveDate,
}

#[async_trait]
impl SnapshotRepository for PostgresSnapshotRepository {
    async fn load(&self, period_id: i64) -> DomainResult<Snapshot> {
        let period_row: PeriodRow = sqlx::query_as(
            "SELECT id, start_date, end_date, status FROM schedule_periods WHERE id = $1",
        )
        .bind(period_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?
        .ok_or_else(|| DomainError::NotFound(format!("schedule period {period_id} not found")))?;

        let status = match period_row.status.as_str() {
            "draft" => PeriodStatus::Draft,
            "published" => PeriodStatus::Published,
            other => {
                return Err(DomainError::DatabaseError(format!(
                    "unknown period status '{other}'"
                )))
            }
        };

        let staff_rows: Vec<StaffRow> = sqlx::query_as(
            "SELECT id, name, role, max_days_per_week, min_days_per_week FROM staff WHERE period_id = $1",
        )
        .bind(period_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let slot_rows: Vec<SlotRow> = sqlx::query_as(
            "SELECT id, name, start_time, end_time FROM shift_slots WHERE period_id = $1",
        )
        .bind(period_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let requirement_rows: Vec<RequirementRow> = sqlx::query_as(
            "SELECT id, shift_slot_id, day_type, min_count FROM staffing_requirements WHERE period_id = $1",
        )
        .bind(period_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let role_requirement_rows: Vec<RoleRequirementRow> = sqlx::query_as(
            "SELECT id, shift_slot_id, day_type, role, min_count FROM role_staffing_requirements WHERE period_id = $1",
        )
        .bind(period_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let request_rows: Vec<RequestRow> = sqlx::query_as(
            "SELECT id, staff_id, date, kind, shift_slot_id FROM staff_requests WHERE period_id = $1",
        )
        .bind(period_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let config_row: Option<ConfigRow> = sqlx::query_as(
            r#"
            SELECT max_consecutive_days, time_limit_seconds, min_shift_interval_hours,
                   enable_preferred_shift, enable_fairness, enable_weekend_fairness,
                   enable_shift_interval, enable_role_staffing, enable_min_days_per_week,
                   enable_soft_staffing, weight_preferred, weight_fairness,
                   weight_weekend_fairness, weight_soft_staffing
            FROM solver_configs WHERE period_id = $1
            "#,
        )
        .bind(period_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let prefix_rows: Vec<PrefixRow> =
            sqlx::query_as("SELECT staff_id, date FROM prefix_assignments WHERE period_id = $1")
                .bind(period_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let mut staff = Vec::with_capacity(staff_rows.len());
        for row in staff_rows {
            staff.push(Staff {
                id: row.id,
                name: row.name,
                role: row.role,
                max_days_per_week: row.max_days_per_week as u8,
                min_days_per_week: row.min_days_per_week as u8,
            });
        }

        let slots = slot_rows
            .into_iter()
            .map(|row| ShiftSlotInfo {
                id: row.id,
                name: row.name,
                start_time: row.start_time,
                end_time: row.end_time,
            })
            .collect();

        let mut requirements = Vec::with_capacity(requirement_rows.len());
        for row in requirement_rows {
            requirements.push(StaffingRequirement {
                id: row.id,
                shift_slot_id: row.shift_slot_id,
                day_type: parse_day_type(&row.day_type)?,
                min_count: row.min_count as u32,
            });
        }

        let mut role_requirements = Vec::with_capacity(role_requirement_rows.len());
        for row in role_requirement_rows {
            role_requirements.push(RoleStaffingRequirement {
                id: row.id,
                shift_slot_id: row.shift_slot_id,
                day_type: parse_day_type(&row.day_type)?,
                role: row.role,
                min_count: row.min_count as u32,
            });
        }

        let mut requests = Vec::with_capacity(request_rows.len());
        for row in request_rows {
            requests.push(StaffRequest {
                id: row.id,
                staff_id: row.staff_id,
                date: row.date,
                kind: parse_request_kind(&row.kind)?,
                shift_slot_id: row.shift_slot_id,
            });
        }

        let config = match config_row {
            Some(row) => SolverConfig {
                max_consecutive_days: row.max_consecutive_days as u32,
                time_limit_seconds: row.time_limit_seconds as u64,
                min_shift_interval_hours: row.min_shift_interval_hours as u32,
                enable_preferred_shift: row.enable_preferred_shift,
                enable_fairness: row.enable_fairness,
                enable_weekend_fairness: row.enable_weekend_fairness,
                enable_shift_interval: row.enable_shift_interval,
                enable_role_staffing: row.enable_role_staffing,
                enable_min_days_per_week: row.enable_min_days_per_week,
                enable_soft_staffing: row.enable_soft_staffing,
                weight_preferred: row.weight_preferred,
                weight_fairness: row.weight_fairness,
                weight_weekend_fairness: row.weight_weekend_fairness,
                weight_soft_staffing: row.weight_soft_staffing,
            },
            None => SolverConfig::default(),
        };

        let prefix_assignments = prefix_rows
            .into_iter()
            .map(|row| (row.staff_id, row.date))
            .collect();

        Ok(Snapshot {
            period: SchedulePeriod {
                id: period_row.id,
                start_date: period_row.start_date,
                end_date: period_row.end_date,
                status,
            },
            staff,
            slots,
            requirements,
            role_requirements,
            requests,
            config,
            prefix_assignments,
        })
    }
}
