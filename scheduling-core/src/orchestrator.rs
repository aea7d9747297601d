//! Ties presolve, model building, the backend, and infeasibility diagnosis
//! into the single call an embedder makes: [`solve`].
//!
//! State progression is linear — Idle -> Presolved -> Solved, or
//! Idle -> Presolved -> NeedsDiagnosis -> Diagnosed — and is expressed here
//! as control flow rather than an explicit state type, since nothing
//! outside this function observes the intermediate states.

use tracing::{info, warn};

use crate::domain::{Snapshot, SolveResult, SolveStatus, DiagnosticItem, DiagnosticTag, Severity};
use crate::error::CoreResult;
use crate::solver::{BackendStatus, MilpBackend};
use crate::{iis, model, presolve, relax};

/// Runs one full solve: presolve sanity checks, model build, backend solve,
/// and — only on infeasibility, and only for the outermost call — a
/// diagnostic pass.
pub fn solve(snapshot: &Snapshot, backend: &dyn MilpBackend) -> CoreResult<SolveResult> {
    solve_internal(snapshot, backend, false)
}

pub(crate) fn solve_internal(
    snapshot: &Snapshot,
    backend: &dyn MilpBackend,
    skip_diagnostics: bool,
) -> CoreResult<SolveResult> {
    let presolve_diagnostics = presolve::run(snapshot);
    if !presolve_diagnostics.is_empty() {
        warn!(
            count = presolve_diagnostics.len(),
            "presolve found potential structural issues; solving anyway"
        );
    }

    let built = model::build(snapshot)?;
    let labels = built.labels.clone();
    let staff_ids = built.vars.staff_ids.clone();
    let dates = built.vars.dates.clone();
    let slot_ids = built.vars.slot_ids.clone();
    let n_dates = dates.len();
    let n_slots = slot_ids.len();

    let status = backend.solve(built, snapshot.config.time_limit_seconds)?;

    match status {
        BackendStatus::Optimal { values, .. } => {
            let mut assignments = Vec::new();
            for (s_idx, &staff_id) in staff_ids.iter().enumerate() {
                for (d_idx, &date) in dates.iter().enumerate() {
                    for (t_idx, &slot_id) in slot_ids.iter().enumerate() {
                        let flat = (s_idx * n_dates + d_idx) * n_slots + t_idx;
                        if values.get(flat).copied().unwrap_or(0.0) > 0.5 {
                            assignments.push(crate::domain::Assignment {
                                staff_id,
                                date,
                                shift_slot_id: slot_id,
                            });
                        }
                    }
                }
            }
            info!(count = assignments.len(), "solve finished optimally");
            Ok(SolveResult {
                status: SolveStatus::Optimal,
                message: "solved to optimality".to_string(),
                assignments,
                diagnostics: Vec::new(),
            })
        }
        BackendStatus::TimedOut => {
            warn!("solve reached its time limit without a feasible incumbent");
            Ok(SolveResult {
                status: SolveStatus::Timeout,
                message: "solver timed out".to_string(),
                assignments: Vec::new(),
                diagnostics: vec![DiagnosticItem::new(
                    DiagnosticTag::Timeout,
                    Severity::Warning,
                    format!(
                        "solver reached the {}s time limit before finding a feasible solution",
                        snapshot.config.time_limit_seconds
                    ),
                )],
            })
        }
        BackendStatus::Infeasible => {
            if skip_diagnostics {
                return Ok(SolveResult {
                    status: SolveStatus::Infeasible,
                    message: "relaxation probe: still infeasible".to_string(),
                    assignments: Vec::new(),
                    diagnostics: Vec::new(),
                });
            }
            info!("solver proved infeasibility, running diagnostics");
            let diagnostics = diagnose(snapshot, backend, &labels, &presolve_diagnostics)?;
            Ok(SolveResult {
                status: SolveStatus::Infeasible,
                message: "the model is infeasible".to_string(),
                assignments: Vec::new(),
                diagnostics,
            })
        }
    }
}

/// Picks the diagnosis source per the orchestrator's fixed priority: presolve
/// findings first (they're cheap and already computed), then the backend's
/// own IIS when it reports one, then the relaxation prober as the fallback
/// every backend shipped here actually exercises.
fn diagnose(
    snapshot: &Snapshot,
    backend: &dyn MilpBackend,
    labels: &[String],
    presolve_diagnostics: &[DiagnosticItem],
) -> CoreResult<Vec<DiagnosticItem>> {
    if !presolve_diagnostics.is_empty() {
        return Ok(presolve_diagnostics.to_vec());
    }
    match backend.infeasible_rows() {
        Some(rows) if !rows.is_empty() => Ok(iis::decode(labels, &rows)),
        _ => relax::probe(snapshot, backend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;
    use crate::solver::HighsBackend;
    use chrono::{NaiveDate, NaiveTime};

    fn three_staff_one_slot(min_count: u32) -> Snapshot {
        Snapshot {
            period: SchedulePeriod {
                id: 1,
                start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
                status: PeriodStatus::Draft,
            },
            staff: (1..=3)
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
    fn feasible_snapshot_solves_optimally() {
        let snap = three_staff_one_slot(2);
        let backend = HighsBackend;
        let result = solve(&snap, &backend).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(!result.assignments.is_empty());
    }

    #[test]
    fn respects_unavailability_requests() {
        let mut snap = three_staff_one_slot(1);
        snap.requests.push(StaffRequest {
            id: 1,
            staff_id: 1,
            date: snap.period.start_date,
            kind: RequestType::Unavailable,
            shift_slot_id: None,
        });
        let backend = HighsBackend;
        let result = solve(&snap, &backend).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(!result
            .assignments
            .iter()
            .any(|a| a.staff_id == 1 && a.date == snap.period.start_date));
    }

    #[test]
    fn structural_shortage_is_caught_by_presolve() {
        let snap = three_staff_one_slot(10);
        let backend = HighsBackend;
        let result = solve(&snap, &backend).unwrap();
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.constraint_tag == "C2_staffing"));
    }

    #[test]
    fn solver_level_infeasibility_is_diagnosed_via_relaxation() {
        // Four staff, max_consecutive_days=1, 3-day period, min_count=4 every
        // day: presolve's daily headroom and weekly checks both pass (there
        // is exactly enough roster capacity) but no staff member may work
        // two days running, so the solver itself proves infeasibility.
        let mut snap = three_staff_one_slot(4);
        snap.staff = (1..=4)
            .map(|id| Staff {
                id,
                name: format!("S{id}"),
                role: "general".into(),
                max_days_per_week: 7,
                min_days_per_week: 0,
            })
            .collect();
        snap.config.max_consecutive_days = 1;
        let backend = HighsBackend;
        let result = solve(&snap, &backend).unwrap();
        assert_eq!(result.status, SolveStatus::Infeasible);
        assert!(!result.diagnostics.is_empty());
    }

    #[test]
    fn consecutive_cap_bounds_every_staff_members_run_length() {
        let mut snap = three_staff_one_slot(2);
        snap.staff = (1..=4)
            .map(|id| Staff {
                id,
                name: format!("S{id}"),
                role: "general".into(),
                max_days_per_week: 5,
                min_days_per_week: 0,
            })
            .collect();
        snap.period.end_date = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        snap.config.max_consecutive_days = 5;

        let backend = HighsBackend;
        let result = solve(&snap, &backend).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);

        for &staff_id in &[1, 2, 3, 4] {
            let mut run = 0u32;
            let mut max_run = 0u32;
            for date in snap.period.dates() {
                if result
                    .assignments
                    .iter()
                    .any(|a| a.staff_id == staff_id && a.date == date)
                {
                    run += 1;
                    max_run = max_run.max(run);
                } else {
                    run = 0;
                }
            }
            assert!(max_run <= 5);
        }
    }

    #[test]
    fn soft_staffing_rescues_an_otherwise_infeasible_snapshot() {
        // 1 staff, min_count=2, 1 day: structurally short by presolve's own
        // count, but a slack column should absorb the shortfall once
        // soft-staffing is enabled, so the solver must still be invoked.
        let mut snap = Snapshot {
            period: SchedulePeriod {
                id: 1,
                start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                status: PeriodStatus::Draft,
            },
            staff: vec![Staff {
                id: 1,
                name: "T".into(),
                role: "general".into(),
                max_days_per_week: 5,
                min_days_per_week: 0,
            }],
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
                min_count: 2,
            }],
            role_requirements: vec![],
            requests: vec![],
            config: SolverConfig::default(),
            prefix_assignments: vec![],
        };
        snap.config.enable_soft_staffing = true;
        snap.config.weight_soft_staffing = 10.0;

        let backend = HighsBackend;
        let result = solve(&snap, &backend).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
    }

    #[test]
    fn preferred_shift_bias_assigns_the_requesting_staff() {
        let mut snap = three_staff_one_slot(1);
        snap.requests.push(StaffRequest {
            id: 1,
            staff_id: 1,
            date: snap.period.start_date,
            kind: RequestType::Preferred,
            shift_slot_id: Some(1),
        });
        snap.config.enable_preferred_shift = true;
        snap.config.weight_preferred = 3.0;

        let backend = HighsBackend;
        let result = solve(&snap, &backend).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(result
            .assignments
            .iter()
            .any(|a| a.staff_id == 1 && a.date == snap.period.start_date && a.shift_slot_id == 1));
    }

    #[test]
    fn role_coverage_is_satisfied_every_weekday() {
        let mut snap = three_staff_one_slot(2);
        snap.staff[0].role = "leader".into();
        snap.config.enable_role_staffing = true;
        snap.role_requirements.push(RoleStaffingRequirement {
            id: 1,
            shift_slot_id: 1,
            day_type: DayType::Weekday,
            role: "leader".into(),
            min_count: 1,
        });

        let backend = HighsBackend;
        let result = solve(&snap, &backend).unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        for date in snap.period.dates() {
            assert!(result
                .assignments
                .iter()
                .any(|a| a.staff_id == 1 && a.date == date));
        }
    }
}
