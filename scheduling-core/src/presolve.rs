//! Cheap arithmetic sanity checks that run alongside every solve, before the
//! model is even built. They never decide feasibility on their own — a
//! feature like soft-staffing can still rescue a snapshot these checks flag
//! — so the orchestrator only substitutes their output for the solver's own
//! diagnosis once the solve itself comes back infeasible. Their diagnostics
//! carry their own taxonomy tags (`C2_staffing`, `C3_unavailable`,
//! `C5_weekly_max`, `B5_role_staffing`) independent of whatever the solver
//! itself reports.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::domain::{
    day_type, week_start, DiagnosticItem, DiagnosticTag, RequestType, Severity, ShiftSlotId,
    Snapshot,
};

pub fn run(snapshot: &Snapshot) -> Vec<DiagnosticItem> {
    let mut diagnostics = Vec::new();
    diagnostics.extend(check_daily_headroom(snapshot));
    diagnostics.extend(check_weekly_capacity(snapshot));
    diagnostics.extend(check_role_eligibility(snapshot));
    diagnostics
}

/// For each (date, slot) with a positive requirement: compare total staff
/// headroom against the requirement, then compare headroom net of that
/// day's unavailable staff. A shortfall that only appears once
/// unavailability is subtracted is tagged `C3_unavailable` rather than
/// `C2_staffing` — the former is fixable by changing who is off, the
/// latter only by hiring or relaxing the requirement.
fn check_daily_headroom(snapshot: &Snapshot) -> Vec<DiagnosticItem> {
    let total_staff = snapshot.staff.len() as u32;
    let mut unavailable_by_date: HashMap<NaiveDate, HashSet<i64>> = HashMap::new();
    for req in &snapshot.requests {
        if req.kind == RequestType::Unavailable {
            unavailable_by_date
                .entry(req.date)
                .or_default()
                .insert(req.staff_id);
        }
    }

    let mut min_count: HashMap<(ShiftSlotId, crate::domain::DayType), u32> = HashMap::new();
    for r in &snapshot.requirements {
        min_count.insert((r.shift_slot_id, r.day_type), r.min_count);
    }

    let mut out = Vec::new();
    for date in snapshot.period.dates() {
        let dt = day_type(date);
        let unavailable_count = unavailable_by_date
            .get(&date)
            .map(|s| s.len() as u32)
            .unwrap_or(0);
        for slot in &snapshot.slots {
            let required = *min_count.get(&(slot.id, dt)).unwrap_or(&0);
            if required == 0 {
                continue;
            }
            if total_staff < required {
                out.push(DiagnosticItem::new(
                    DiagnosticTag::C2Staffing,
                    Severity::Error,
                    format!(
                        "{} needs {} staff on {} ({} total on roster)",
                        slot.name, required, date, total_staff
                    ),
                ));
                continue;
            }
            let available = total_staff.saturating_sub(unavailable_count);
            if available < required {
                out.push(DiagnosticItem::new(
                    DiagnosticTag::C3Unavailable,
                    Severity::Error,
                    format!(
                        "{} needs {} staff on {} but only {} are available ({} marked unavailable)",
                        slot.name, required, date, available, unavailable_count
                    ),
                ));
            }
        }
    }
    out
}

/// Sums required staff-shifts per ISO week against the roster's combined
/// `max_days_per_week` capacity for that same week.
fn check_weekly_capacity(snapshot: &Snapshot) -> Vec<DiagnosticItem> {
    let mut min_count: HashMap<(ShiftSlotId, crate::domain::DayType), u32> = HashMap::new();
    for r in &snapshot.requirements {
        min_count.insert((r.shift_slot_id, r.day_type), r.min_count);
    }

    let mut demand_by_week: HashMap<NaiveDate, u32> = HashMap::new();
    for date in snapshot.period.dates() {
        let dt = day_type(date);
        let demand: u32 = snapshot
            .slots
            .iter()
            .map(|slot| *min_count.get(&(slot.id, dt)).unwrap_or(&0))
            .sum();
        *demand_by_week.entry(week_start(date)).or_insert(0) += demand;
    }

    let mut days_in_week: HashMap<NaiveDate, u32> = HashMap::new();
    for date in snapshot.period.dates() {
        *days_in_week.entry(week_start(date)).or_insert(0) += 1;
    }

    let mut out = Vec::new();
    let mut weeks: Vec<NaiveDate> = demand_by_week.keys().copied().collect();
    weeks.sort_unstable();
    for week in weeks {
        let demand = demand_by_week[&week];
        let present_days = days_in_week.get(&week).copied().unwrap_or(0);
        let supply: u32 = snapshot
            .staff
            .iter()
            .map(|s| s.max_days_per_week.min(present_days as u8) as u32)
            .sum();
        if demand > supply {
            out.push(DiagnosticItem::new(
                DiagnosticTag::C5WeeklyMax,
                Severity::Error,
                format!(
                    "week of {} needs {} staff-shifts but roster capacity is {}",
                    week, demand, supply
                ),
            ));
        }
    }
    out
}

/// A role requirement that no staff member on the roster can ever satisfy
/// is infeasible regardless of the date it falls on.
fn check_role_eligibility(snapshot: &Snapshot) -> Vec<DiagnosticItem> {
    if !snapshot.config.enable_role_staffing {
        return Vec::new();
    }
    let mut out = Vec::new();
    for req in &snapshot.role_requirements {
        let eligible = snapshot.staff.iter().filter(|s| s.role == req.role).count() as u32;
        if eligible < req.min_count {
            out.push(DiagnosticItem::new(
                DiagnosticTag::B5RoleStaffing,
                Severity::Error,
                format!(
                    "role '{}' needs {} staff but only {} are on the roster",
                    req.role, req.min_count, eligible
                ),
            ));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;
    use chrono::{NaiveDate, NaiveTime};

    fn snapshot_with(min_count: u32, total_staff: usize) -> Snapshot {
        Snapshot {
            period: SchedulePeriod {
                id: 1,
                start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                status: PeriodStatus::Draft,
            },
            staff: (1..=total_staff as i64)
                .map(|id| Staff {
                    id,
                    name: format!("S{id}"),
                    role: "general".into(),
                    max_days_per_week: 5,
                    min_days_per_week: 0,
                })
                .collect(),
            slots: vec![ShiftSlotInfo {
                id: 1,
                name: "morning".into(),
                start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            }],
            requirements: vec![StaffingRequirement {
                id: 1,
                shift_slot_id: 1,
                day_type: DayType::Weekday,
                min_count,
            }],
            role_requirements: vec![],
            requests: vec![],
            config: SolverConfig::default(),
            prefix_assignments: vec![],
        }
    }

    #[test]
    fn structural_shortage_is_tagged_c2() {
        let snap = snapshot_with(3, 2);
        let diags = check_daily_headroom(&snap);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].constraint_tag, "C2_staffing");
    }

    #[test]
    fn unavailability_shortage_is_tagged_c3() {
        let mut snap = snapshot_with(2, 2);
        snap.requests.push(StaffRequest {
            id: 1,
            staff_id: 1,
            date: snap.period.start_date,
            kind: RequestType::Unavailable,
            shift_slot_id: None,
        });
        let diags = check_daily_headroom(&snap);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].constraint_tag, "C3_unavailable");
    }

    #[test]
    fn sufficient_staff_raises_nothing() {
        let snap = snapshot_with(1, 3);
        assert!(run(&snap).is_empty());
    }

    #[test]
    fn role_shortfall_is_flagged_when_enabled() {
        let mut snap = snapshot_with(1, 1);
        snap.config.enable_role_staffing = true;
        snap.role_requirements.push(RoleStaffingRequirement {
            id: 1,
            shift_slot_id: 1,
            day_type: DayType::Weekday,
            role: "nurse".into(),
            min_count: 1,
        });
        let diags = check_role_eligibility(&snap);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].constraint_tag, "B5_role_staffing");
    }
}
