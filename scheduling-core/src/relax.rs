//! Fallback infeasibility diagnosis for backends that cannot report an IIS.
//!
//! Each candidate relaxes exactly one hard-constraint family and re-runs the
//! full presolve-then-solve pipeline on the relaxed snapshot with
//! `skip_diagnostics` set, so a still-infeasible relaxation doesn't recurse
//! into another round of probing. A candidate that turns the problem
//! feasible identifies its family as (part of) the root cause.

use crate::domain::{DiagnosticItem, DiagnosticTag, RequestType, Severity, Snapshot, SolveStatus};
use crate::error::CoreResult;
use crate::solver::MilpBackend;

type Relaxer = fn(&Snapshot) -> Snapshot;

fn candidates() -> Vec<(DiagnosticTag, Relaxer)> {
    vec![
        (DiagnosticTag::C3Unavailable, drop_unavailability),
        (DiagnosticTag::C4Consecutive, widen_consecutive_days),
        (DiagnosticTag::C5WeeklyMax, widen_weekly_max),
        (DiagnosticTag::B4Interval, disable_shift_interval),
        (DiagnosticTag::B5RoleStaffing, disable_role_staffing),
        (DiagnosticTag::B6MinDays, disable_min_days_per_week),
        (DiagnosticTag::C2Staffing, enable_soft_staffing),
    ]
}

pub fn probe(snapshot: &Snapshot, backend: &dyn MilpBackend) -> CoreResult<Vec<DiagnosticItem>> {
    let mut found = Vec::new();
    for (tag, relax) in candidates() {
        let relaxed = relax(snapshot);
        let result = crate::orchestrator::solve_internal(&relaxed, backend, true)?;
        if result.status == SolveStatus::Optimal {
            found.push(DiagnosticItem::new(
                tag,
                Severity::Error,
                format!(
                    "relaxing the '{}' constraint family restores feasibility",
                    tag.as_str()
                ),
            ));
        }
    }

    if found.is_empty() {
        found.push(DiagnosticItem::new(
            DiagnosticTag::Combined,
            Severity::Error,
            "no single constraint family's relaxation restores feasibility; \
             the infeasibility is combinatorial"
                .to_string(),
        ));
    }
    Ok(found)
}

fn drop_unavailability(snapshot: &Snapshot) -> Snapshot {
    let mut out = snapshot.clone();
    out.requests
        .retain(|r| r.kind != RequestType::Unavailable);
    out
}

fn widen_consecutive_days(snapshot: &Snapshot) -> Snapshot {
    let mut out = snapshot.clone();
    out.config.max_consecutive_days = out.period.dates().len() as u32 + 1;
    out
}

fn widen_weekly_max(snapshot: &Snapshot) -> Snapshot {
    let mut out = snapshot.clone();
    let period_len = out.period.dates().len() as u8;
    for s in &mut out.staff {
        s.max_days_per_week = period_len.max(7);
    }
    out
}

fn disable_shift_interval(snapshot: &Snapshot) -> Snapshot {
    let mut out = snapshot.clone();
    out.config.enable_shift_interval = false;
    out
}

fn disable_role_staffing(snapshot: &Snapshot) -> Snapshot {
    let mut out = snapshot.clone();
    out.config.enable_role_staffing = false;
    out
}

fn disable_min_days_per_week(snapshot: &Snapshot) -> Snapshot {
    let mut out = snapshot.clone();
    out.config.enable_min_days_per_week = false;
    out
}

fn enable_soft_staffing(snapshot: &Snapshot) -> Snapshot {
    let mut out = snapshot.clone();
    out.config.enable_soft_staffing = true;
    out
}
