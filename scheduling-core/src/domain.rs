//! Plain data carriers for one optimization request.
//!
//! Nothing in this module owns I/O or mutates after construction: a [`Snapshot`]
//! is handed to [`crate::orchestrator::solve`] by value (by reference, really —
//! see its signature) and lives only for the duration of that call.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type StaffId = i64;
pub type ShiftSlotId = i64;
pub type RequirementId = i64;
pub type RoleRequirementId = i64;
pub type RequestId = i64;
pub type PeriodId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn as_str(self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
        }
    }
}

/// `day_type(d) = "weekend" if weekday(d) in {Saturday, Sunday} else "weekday"`.
pub fn day_type(date: NaiveDate) -> DayType {
    match date.weekday() {
        Weekday::Sat | Weekday::Sun => DayType::Weekend,
        _ => DayType::Weekday,
    }
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RequestType {
    Preferred,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PeriodStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Timeout,
}

/// A taxonomy tag attached to every diagnostic; also the label prefix used
/// when building hard constraints (see `model::ConstraintTag`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticTag {
    C2Staffing,
    C3Unavailable,
    C4Consecutive,
    C5WeeklyMax,
    B4Interval,
    B5RoleStaffing,
    B6MinDays,
    Combined,
    Timeout,
}

impl DiagnosticTag {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticTag::C2Staffing => "C2_staffing",
            DiagnosticTag::C3Unavailable => "C3_unavailable",
            DiagnosticTag::C4Consecutive => "C4_consecutive",
            DiagnosticTag::C5WeeklyMax => "C5_weekly_max",
            DiagnosticTag::B4Interval => "B4_interval",
            DiagnosticTag::B5RoleStaffing => "B5_role_staffing",
            DiagnosticTag::B6MinDays => "B6_min_days",
            DiagnosticTag::Combined => "combined",
            DiagnosticTag::Timeout => "timeout",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagnosticItem {
    pub constraint_tag: String,
    pub severity: Severity,
    pub message: String,
}

impl DiagnosticItem {
    pub fn new(tag: DiagnosticTag, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            constraint_tag: tag.as_str().to_string(),
            severity,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    pub role: String,
    pub max_days_per_week: u8,
    pub min_days_per_week: u8,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShiftSlot {
    pub id: ShiftSlotId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShiftSlotInfo {
    pub id: ShiftSlotId,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StaffingRequirement {
    pub id: RequirementId,
    pub shift_slot_id: ShiftSlotId,
    pub day_type: DayType,
    pub min_count: u32,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RoleStaffingRequirement {
    pub id: RoleRequirementId,
    pub shift_slot_id: ShiftSlotId,
    pub day_type: DayType,
    pub role: String,
    pub min_count: u32,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StaffRequest {
    pub id: RequestId,
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub kind: RequestType,
    /// `None` under `Preferred` means "any slot that day". Always `Some` for `Unavailable`.
    pub shift_slot_id: Option<ShiftSlotId>,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulePeriod {
    pub id: PeriodId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PeriodStatus,
}

impl SchedulePeriod {
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let mut d = self.start_date;
        while d <= self.end_date {
            out.push(d);
            d += chrono::Duration::days(1);
        }
        out
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    pub max_consecutive_days: u32,
    pub time_limit_seconds: u64,
    pub min_shift_interval_hours: u32,

    pub enable_preferred_shift: bool,
    pub enable_fairness: bool,
    pub enable_weekend_fairness: bool,
    pub enable_shift_interval: bool,
    pub enable_role_staffing: bool,
    pub enable_min_days_per_week: bool,
    pub enable_soft_staffing: bool,

    pub weight_preferred: f64,
    pub weight_fairness: f64,
    pub weight_weekend_fairness: f64,
    pub weight_soft_staffing: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_consecutive_days: 6,
            time_limit_seconds: 30,
            min_shift_interval_hours: 11,
            enable_preferred_shift: true,
            enable_fairness: true,
            enable_weekend_fairness: true,
            enable_shift_interval: true,
            enable_role_staffing: false,
            enable_min_days_per_week: false,
            enable_soft_staffing: false,
            weight_preferred: 3.0,
            weight_fairness: 2.0,
            weight_weekend_fairness: 2.0,
            weight_soft_staffing: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub shift_slot_id: ShiftSlotId,
}

/// Immutable input bundle to one `solve` call. Never mutated by the core;
/// the relaxation prober builds modified copies (see `relax::relaxed_snapshot`).
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub period: SchedulePeriod,
    pub staff: Vec<Staff>,
    pub slots: Vec<ShiftSlotInfo>,
    pub requirements: Vec<StaffingRequirement>,
    pub role_requirements: Vec<RoleStaffingRequirement>,
    pub requests: Vec<StaffRequest>,
    pub config: SolverConfig,
    /// Dates immediately preceding `period.start_date` on which a staff member
    /// is already known to have worked, for consecutive-days continuity across
    /// periods. Empty when the caller has no prior period to report.
    pub prefix_assignments: Vec<(StaffId, NaiveDate)>,
}

#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub message: String,
    pub assignments: Vec<Assignment>,
    pub diagnostics: Vec<DiagnosticItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_type_classifies_weekend() {
        let sat = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let mon = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(day_type(sat), DayType::Weekend);
        assert_eq!(day_type(mon), DayType::Weekday);
    }

    #[test]
    fn week_start_is_monday() {
        let wed = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let mon = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(week_start(wed), mon);
        assert_eq!(week_start(mon), mon);
    }

    #[test]
    fn period_dates_are_inclusive() {
        let period = SchedulePeriod {
            id: 1,
            start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
            status: PeriodStatus::Draft,
        };
        assert_eq!(period.dates().len(), 3);
    }
}
