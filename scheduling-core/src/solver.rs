//! The pluggable MILP backend seam and the HiGHS implementation behind it.
//!
//! `MilpBackend` exists so the diagnostic pipeline never hard-codes a
//! particular solver's API. `infeasible_rows` is the one method a richer
//! backend (a Cbc build with IIS support, say) would actually populate;
//! [`HighsBackend`] always returns `None` there, which is what routes every
//! infeasibility through the relaxation prober instead of the IIS decoder
//! on this build (see DESIGN.md).

use highs::{HighsModelStatus, RowProblem, Sense};

use crate::error::{CoreError, CoreResult};
use crate::model::Model;

#[derive(Debug, Clone, PartialEq)]
pub enum BackendStatus {
    Optimal { objective: f64, values: Vec<f64> },
    Infeasible,
    TimedOut,
}

/// A MILP solve driver, decoupled from any one solver crate.
pub trait MilpBackend {
    fn solve(&self, model: Model, time_limit_seconds: u64) -> CoreResult<BackendStatus>;

    /// Row indices (into `model.labels`) that an IIS computation found
    /// irreducibly infeasible, if this backend can compute one.
    fn infeasible_rows(&self) -> Option<Vec<usize>> {
        None
    }
}

/// Backend over the `highs` crate, grounded on the MILP dependency the
/// wider example pack uses for staff-scheduling-shaped problems.
#[derive(Debug, Default)]
pub struct HighsBackend;

impl MilpBackend for HighsBackend {
    fn solve(&self, model: Model, time_limit_seconds: u64) -> CoreResult<BackendStatus> {
        let Model { problem, .. } = model;
        let solved = run_highs(problem, time_limit_seconds)?;
        Ok(solved)
    }

    fn infeasible_rows(&self) -> Option<Vec<usize>> {
        None
    }
}

fn run_highs(problem: RowProblem, time_limit_seconds: u64) -> CoreResult<BackendStatus> {
    let mut model = problem.optimise(Sense::Minimise);
    model.set_option("time_limit", time_limit_seconds as f64);
    model.set_option("output_flag", false);

    let solved = model.solve();
    match solved.status() {
        HighsModelStatus::Optimal => {
            let solution = solved.get_solution();
            Ok(BackendStatus::Optimal {
                objective: solved.objective_value(),
                values: solution.columns().to_vec(),
            })
        }
        HighsModelStatus::Infeasible => Ok(BackendStatus::Infeasible),
        HighsModelStatus::ReachedTimeLimit => {
            // HiGHS reports a finite objective only once it has found some
            // primal feasible incumbent; with none yet, the objective stays
            // at its sentinel (infinite, for a minimisation) value.
            let objective = solved.objective_value();
            if objective.is_finite() {
                let solution = solved.get_solution();
                Ok(BackendStatus::Optimal {
                    objective,
                    values: solution.columns().to_vec(),
                })
            } else {
                Ok(BackendStatus::TimedOut)
            }
        }
        other => Err(CoreError::BackendFailure(format!(
            "unexpected HiGHS model status: {other:?}"
        ))),
    }
}
