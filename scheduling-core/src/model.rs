//! Translates a [`Snapshot`] into a labeled MILP.
//!
//! Variable and row emission order is deterministic (sorted staff, dates,
//! slots) so that two builds of the same snapshot produce byte-identical
//! solver input — this is what makes `solve` reproducible (§5 of the spec).

use std::collections::{HashMap, HashSet};
use std::ops::RangeBounds;

use chrono::{Duration, NaiveDate, Timelike};
use highs::{Col, RowProblem};

use crate::domain::{
    day_type, week_start, DayType, RequestType, ShiftSlotId, Snapshot, StaffId,
};
use crate::error::{CoreError, CoreResult};

/// Category prefix of a constraint label — the bridge the IIS decoder and
/// relaxation prober both use to classify a labeled row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintCategory {
    One,
    Staffing,
    Unavail,
    Consec,
    Weekly,
    Interval,
    Role,
    MinDays,
    FairMax,
    FairMin,
    WeekendFairMax,
    WeekendFairMin,
}

impl ConstraintCategory {
    pub fn from_label(label: &str) -> Option<Self> {
        let prefix = label.split('_').next().unwrap_or("");
        Some(match prefix {
            "one" => ConstraintCategory::One,
            "staffing" => ConstraintCategory::Staffing,
            "unavail" => ConstraintCategory::Unavail,
            "consec" => ConstraintCategory::Consec,
            "weekly" => ConstraintCategory::Weekly,
            "interval" => ConstraintCategory::Interval,
            "role" => ConstraintCategory::Role,
            "mindays" => ConstraintCategory::MinDays,
            "fairmax" => ConstraintCategory::FairMax,
            "fairmin" => ConstraintCategory::FairMin,
            "wfairmax" => ConstraintCategory::WeekendFairMax,
            "wfairmin" => ConstraintCategory::WeekendFairMin,
            _ => return None,
        })
    }
}

fn ymd(d: NaiveDate) -> String {
    d.format("%Y%m%d").to_string()
}

/// Flat index of `x[s,d,t]` columns plus the optional auxiliary variables.
pub struct ModelVars {
    pub staff_ids: Vec<StaffId>,
    pub dates: Vec<NaiveDate>,
    pub slot_ids: Vec<ShiftSlotId>,
    x: Vec<Col>,
    pub z_max: Option<Col>,
    pub z_min: Option<Col>,
    pub zw_max: Option<Col>,
    pub zw_min: Option<Col>,
    pub slack: HashMap<(usize, usize), Col>,
}

impl ModelVars {
    fn n_dates(&self) -> usize {
        self.dates.len()
    }
    fn n_slots(&self) -> usize {
        self.slot_ids.len()
    }

    fn flat(&self, s: usize, d: usize, t: usize) -> usize {
        (s * self.n_dates() + d) * self.n_slots() + t
    }

    pub fn x_col(&self, s: usize, d: usize, t: usize) -> Col {
        self.x[self.flat(s, d, t)]
    }

    pub fn staff_idx(&self, id: StaffId) -> Option<usize> {
        self.staff_ids.iter().position(|&x| x == id)
    }

    pub fn date_idx(&self, d: NaiveDate) -> Option<usize> {
        self.dates.iter().position(|&x| x == d)
    }

    pub fn slot_idx(&self, id: ShiftSlotId) -> Option<usize> {
        self.slot_ids.iter().position(|&x| x == id)
    }
}

pub struct Model {
    pub problem: RowProblem,
    pub labels: Vec<String>,
    pub vars: ModelVars,
}

struct Builder {
    problem: RowProblem,
    labels: Vec<String>,
}

impl Builder {
    fn row<R: RangeBounds<f64>>(&mut self, label: String, bounds: R, terms: &[(Col, f64)]) {
        self.problem.add_row(bounds, terms.iter().copied());
        self.labels.push(label);
    }
}

pub fn build(snapshot: &Snapshot) -> CoreResult<Model> {
    let mut staff_ids: Vec<StaffId> = snapshot.staff.iter().map(|s| s.id).collect();
    staff_ids.sort_unstable();
    let dates = snapshot.period.dates();
    let mut slot_ids: Vec<ShiftSlotId> = snapshot.slots.iter().map(|s| s.id).collect();
    slot_ids.sort_unstable();

    if staff_ids.is_empty() || dates.is_empty() || slot_ids.is_empty() {
        return Err(CoreError::ModelBuildFailure(
            "snapshot has no staff, no dates, or no shift slots".to_string(),
        ));
    }

    let n_staff = staff_ids.len();
    let n_dates = dates.len();
    let n_slots = slot_ids.len();

    let cfg = &snapshot.config;

    // --- unavailability & preferred-request lookups -----------------------
    let mut unavailable: HashSet<(StaffId, NaiveDate)> = HashSet::new();
    let mut preferred_any: HashSet<(StaffId, NaiveDate)> = HashSet::new();
    let mut preferred_slot: HashSet<(StaffId, NaiveDate, ShiftSlotId)> = HashSet::new();
    for req in &snapshot.requests {
        match req.kind {
            RequestType::Unavailable => {
                unavailable.insert((req.staff_id, req.date));
            }
            RequestType::Preferred => match req.shift_slot_id {
                Some(slot_id) => {
                    preferred_slot.insert((req.staff_id, req.date, slot_id));
                }
                None => {
                    preferred_any.insert((req.staff_id, req.date));
                }
            },
        }
    }

    // --- required counts per (date, slot) ---------------------------------
    let mut min_count: HashMap<(ShiftSlotId, DayType), u32> = HashMap::new();
    for r in &snapshot.requirements {
        min_count.insert((r.shift_slot_id, r.day_type), r.min_count);
    }

    let weekend_dates: Vec<NaiveDate> = dates
        .iter()
        .copied()
        .filter(|d| day_type(*d) == DayType::Weekend)
        .collect();

    // --- columns: x[s,d,t] --------------------------------------------------
    let mut problem = RowProblem::default();
    let mut x = Vec::with_capacity(n_staff * n_dates * n_slots);
    for &staff_id in staff_ids.iter() {
        for &date in dates.iter() {
            for &slot_id in slot_ids.iter() {
                let mut coeff = 1.0;
                if cfg.enable_preferred_shift {
                    let is_preferred = preferred_slot.contains(&(staff_id, date, slot_id))
                        || preferred_any.contains(&(staff_id, date));
                    if is_preferred {
                        coeff -= cfg.weight_preferred;
                    }
                }
                x.push(problem.add_integer_column(coeff, 0.0..=1.0));
            }
        }
    }

    // --- auxiliary continuous variables -------------------------------------
    let (z_max, z_min) = if cfg.enable_fairness {
        (
            Some(problem.add_column(cfg.weight_fairness, 0.0..)),
            Some(problem.add_column(-cfg.weight_fairness, 0.0..)),
        )
    } else {
        (None, None)
    };

    let (zw_max, zw_min) = if cfg.enable_weekend_fairness && !weekend_dates.is_empty() {
        (
            Some(problem.add_column(cfg.weight_weekend_fairness, 0.0..)),
            Some(problem.add_column(-cfg.weight_weekend_fairness, 0.0..)),
        )
    } else {
        (None, None)
    };

    let mut slack: HashMap<(usize, usize), Col> = HashMap::new();
    if cfg.enable_soft_staffing {
        for (d_idx, &date) in dates.iter().enumerate() {
            for (t_idx, &slot_id) in slot_ids.iter().enumerate() {
                let required = *min_count.get(&(slot_id, day_type(date))).unwrap_or(&0);
                if required > 0 {
                    let col = problem.add_column(cfg.weight_soft_staffing, 0.0..);
                    slack.insert((d_idx, t_idx), col);
                }
            }
        }
    }

    let vars = ModelVars {
        staff_ids,
        dates,
        slot_ids,
        x,
        z_max,
        z_min,
        zw_max,
        zw_min,
        slack,
    };

    let mut b = Builder {
        problem,
        labels: Vec::new(),
    };

    // one_: at most one slot per staff-day
    for s_idx in 0..n_staff {
        for d_idx in 0..n_dates {
            let terms: Vec<(Col, f64)> = (0..n_slots)
                .map(|t_idx| (vars.x_col(s_idx, d_idx, t_idx), 1.0))
                .collect();
            let label = format!("one_{}_{}", vars.staff_ids[s_idx], ymd(vars.dates[d_idx]));
            b.row(label, ..=1.0, &terms);
        }
    }

    // staffing_: required coverage (+ slack when soft-staffing enabled)
    for (d_idx, &date) in vars.dates.iter().enumerate() {
        for (t_idx, &slot_id) in vars.slot_ids.iter().enumerate() {
            let required = *min_count.get(&(slot_id, day_type(date))).unwrap_or(&0);
            if required == 0 {
                continue;
            }
            let mut terms: Vec<(Col, f64)> = (0..n_staff)
                .map(|s_idx| (vars.x_col(s_idx, d_idx, t_idx), 1.0))
                .collect();
            if let Some(&slack_col) = vars.slack.get(&(d_idx, t_idx)) {
                terms.push((slack_col, 1.0));
            }
            let label = format!("staffing_{}_{}", ymd(date), slot_id);
            b.row(label, (required as f64).., &terms);
        }
    }

    // unavail_: blocked staff-day, one row per slot per the label grammar
    for (s_idx, &staff_id) in vars.staff_ids.iter().enumerate() {
        for (d_idx, &date) in vars.dates.iter().enumerate() {
            if !unavailable.contains(&(staff_id, date)) {
                continue;
            }
            for (t_idx, &slot_id) in vars.slot_ids.iter().enumerate() {
                let label = format!("unavail_{}_{}_{}", staff_id, ymd(date), slot_id);
                b.row(label, 0.0..=0.0, &[(vars.x_col(s_idx, d_idx, t_idx), 1.0)]);
            }
        }
    }

    // consec_: sliding window of max_consecutive_days + 1, extended backwards
    // across the period boundary using prefix_assignments (see DESIGN.md).
    let k = cfg.max_consecutive_days as i64;
    for (s_idx, &staff_id) in vars.staff_ids.iter().enumerate() {
        let fixed: HashSet<NaiveDate> = snapshot
            .prefix_assignments
            .iter()
            .filter(|(id, _)| *id == staff_id)
            .map(|(_, d)| *d)
            .collect();
        let earliest_start = fixed
            .iter()
            .min()
            .copied()
            .unwrap_or(snapshot.period.start_date);
        let last_possible_start = snapshot.period.end_date - Duration::days(k);
        let mut w_start = earliest_start;
        while w_start <= last_possible_start {
            let mut terms: Vec<(Col, f64)> = Vec::new();
            let mut fixed_count = 0i64;
            for offset in 0..=k {
                let d = w_start + Duration::days(offset);
                if let Some(d_idx) = vars.date_idx(d) {
                    for t_idx in 0..n_slots {
                        terms.push((vars.x_col(s_idx, d_idx, t_idx), 1.0));
                    }
                } else if fixed.contains(&d) {
                    fixed_count += 1;
                }
            }
            if !terms.is_empty() {
                let rhs = (k - fixed_count).max(0) as f64;
                let label = format!("consec_{}_{}", staff_id, ymd(w_start));
                b.row(label, ..=rhs, &terms);
            }
            w_start += Duration::days(1);
        }
    }

    // weekly_ / mindays_: per ISO week intersecting the period
    let mut weeks: Vec<NaiveDate> = vars.dates.iter().map(|&d| week_start(d)).collect();
    weeks.sort_unstable();
    weeks.dedup();
    for (s_idx, staff) in snapshot.staff.iter().enumerate() {
        let staff_id = staff.id;
        for &wk in &weeks {
            let terms: Vec<(Col, f64)> = vars
                .dates
                .iter()
                .enumerate()
                .filter(|(_, &d)| week_start(d) == wk)
                .flat_map(|(d_idx, _)| {
                    (0..n_slots).map(move |t_idx| (vars.x_col(s_idx, d_idx, t_idx), 1.0))
                })
                .collect();

            let label = format!("weekly_{}_{}", staff_id, ymd(wk));
            b.row(label, ..=(staff.max_days_per_week as f64), &terms);

            if cfg.enable_min_days_per_week && staff.min_days_per_week > 0 {
                let label = format!("mindays_{}_{}", staff_id, ymd(wk));
                b.row(label, (staff.min_days_per_week as f64).., &terms);
            }
        }
    }

    // interval_: inter-shift rest, only for d -> d+1 pairs within the period
    if cfg.enable_shift_interval {
        let conflicts = conflicting_slot_pairs(snapshot, cfg.min_shift_interval_hours);
        if !conflicts.is_empty() {
            for (s_idx, &staff_id) in vars.staff_ids.iter().enumerate() {
                for d_idx in 0..n_dates.saturating_sub(1) {
                    let date = vars.dates[d_idx];
                    let next_idx = d_idx + 1;
                    if vars.dates[next_idx] != date + Duration::days(1) {
                        continue;
                    }
                    for &(slot_a, slot_b) in &conflicts {
                        let (Some(a_idx), Some(b_idx)) =
                            (vars.slot_idx(slot_a), vars.slot_idx(slot_b))
                        else {
                            continue;
                        };
                        let label =
                            format!("interval_{}_{}_{}_{}", staff_id, ymd(date), slot_a, slot_b);
                        b.row(
                            label,
                            ..=1.0,
                            &[
                                (vars.x_col(s_idx, d_idx, a_idx), 1.0),
                                (vars.x_col(s_idx, next_idx, b_idx), 1.0),
                            ],
                        );
                    }
                }
            }
        }
    }

    // role_: per-role coverage
    if cfg.enable_role_staffing {
        for req in &snapshot.role_requirements {
            let Some(t_idx) = vars.slot_idx(req.shift_slot_id) else {
                continue;
            };
            let matching_staff: Vec<usize> = snapshot
                .staff
                .iter()
                .enumerate()
                .filter(|(_, s)| s.role == req.role)
                .map(|(i, _)| i)
                .collect();
            for (d_idx, &date) in vars.dates.iter().enumerate() {
                if day_type(date) != req.day_type {
                    continue;
                }
                let terms: Vec<(Col, f64)> = matching_staff
                    .iter()
                    .map(|&s_idx| (vars.x_col(s_idx, d_idx, t_idx), 1.0))
                    .collect();
                let label = format!("role_{}_{}_{}", req.id, ymd(date), req.shift_slot_id);
                b.row(label, (req.min_count as f64).., &terms);
            }
        }
    }

    // fairmax_/fairmin_: per-staff fairness brackets
    if let (Some(z_max), Some(z_min)) = (vars.z_max, vars.z_min) {
        for s_idx in 0..n_staff {
            let terms: Vec<(Col, f64)> = (0..n_dates)
                .flat_map(|d_idx| (0..n_slots).map(move |t_idx| (s_idx, d_idx, t_idx)))
                .map(|(s, d, t)| (vars.x_col(s, d, t), 1.0))
                .collect();

            let mut max_terms = terms.clone();
            max_terms.push((z_max, -1.0));
            b.row(
                format!("fairmax_{}", vars.staff_ids[s_idx]),
                ..=0.0,
                &max_terms,
            );

            let mut min_terms = terms;
            min_terms.push((z_min, -1.0));
            b.row(
                format!("fairmin_{}", vars.staff_ids[s_idx]),
                0.0..,
                &min_terms,
            );
        }
    }

    // wfairmax_/wfairmin_: per-staff weekend fairness brackets
    if let (Some(zw_max), Some(zw_min)) = (vars.zw_max, vars.zw_min) {
        for s_idx in 0..n_staff {
            let terms: Vec<(Col, f64)> = vars
                .dates
                .iter()
                .enumerate()
                .filter(|(_, &d)| day_type(d) == DayType::Weekend)
                .flat_map(|(d_idx, _)| (0..n_slots).map(move |t_idx| (d_idx, t_idx)))
                .map(|(d, t)| (vars.x_col(s_idx, d, t), 1.0))
                .collect();

            let mut max_terms = terms.clone();
            max_terms.push((zw_max, -1.0));
            b.row(
                format!("wfairmax_{}", vars.staff_ids[s_idx]),
                ..=0.0,
                &max_terms,
            );

            let mut min_terms = terms;
            min_terms.push((zw_min, -1.0));
            b.row(
                format!("wfairmin_{}", vars.staff_ids[s_idx]),
                0.0..,
                &min_terms,
            );
        }
    }

    Ok(Model {
        problem: b.problem,
        labels: b.labels,
        vars,
    })
}

/// Two slots (a -> b) conflict under a minimum rest of `hours` iff
/// `(1440 - end_minutes(a)) + start_minutes(b) < 60 * hours`.
fn conflicting_slot_pairs(
    snapshot: &Snapshot,
    hours: u32,
) -> Vec<(ShiftSlotId, ShiftSlotId)> {
    let mut out = Vec::new();
    let rest_minutes = 60 * hours as i64;
    for a in &snapshot.slots {
        let end_minutes = a.end_time.hour() as i64 * 60 + a.end_time.minute() as i64;
        for b in &snapshot.slots {
            let start_minutes = b.start_time.hour() as i64 * 60 + b.start_time.minute() as i64;
            let gap = (1440 - end_minutes) + start_minutes;
            if gap < rest_minutes {
                out.push((a.id, b.id));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;
    use chrono::NaiveTime;

    fn basic_snapshot() -> Snapshot {
        Snapshot {
            period: SchedulePeriod {
                id: 1,
                start_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2026, 3, 4).unwrap(),
                status: PeriodStatus::Draft,
            },
            staff: vec![
                Staff {
                    id: 1,
                    name: "T".into(),
                    role: "general".into(),
                    max_days_per_week: 5,
                    min_days_per_week: 0,
                },
                Staff {
                    id: 2,
                    name: "S".into(),
                    role: "general".into(),
                    max_days_per_week: 5,
                    min_days_per_week: 0,
                },
                Staff {
                    id: 3,
                    name: "K".into(),
                    role: "general".into(),
                    max_days_per_week: 5,
                    min_days_per_week: 0,
                },
            ],
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
        }
    }

    #[test]
    fn labels_cover_one_and_staffing_categories() {
        let snap = basic_snapshot();
        let model = build(&snap).unwrap();
        assert!(model.labels.iter().any(|l| l.starts_with("one_")));
        assert!(model.labels.iter().any(|l| l.starts_with("staffing_")));
        assert!(model.labels.iter().any(|l| l.starts_with("weekly_")));
        assert!(model.labels.iter().any(|l| l.starts_with("consec_")));
    }

    #[test]
    fn label_count_matches_row_count() {
        let snap = basic_snapshot();
        let model = build(&snap).unwrap();
        // every row gets exactly one label
        assert!(!model.labels.is_empty());
    }

    #[test]
    fn empty_staff_is_rejected() {
        let mut snap = basic_snapshot();
        snap.staff.clear();
        assert!(build(&snap).is_err());
    }
}
