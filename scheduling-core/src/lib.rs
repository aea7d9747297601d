//! Shift-scheduling MILP model builder, solver driver, and infeasibility
//! diagnostics.
//!
//! This crate owns no I/O: it is handed a [`domain::Snapshot`] describing one
//! scheduling period and returns a [`domain::SolveResult`]. Persistence, HTTP,
//! and job orchestration live one layer up, in the service that embeds this
//! crate.
//!
//! ```ignore
//! let result = scheduling_core::orchestrator::solve(&snapshot, &scheduling_core::solver::HighsBackend)?;
//! ```

pub mod domain;
pub mod error;
pub mod iis;
pub mod model;
pub mod orchestrator;
pub mod presolve;
pub mod relax;
pub mod solver;

pub use domain::{Snapshot, SolveResult};
pub use error::{CoreError, CoreResult};
pub use orchestrator::solve;
