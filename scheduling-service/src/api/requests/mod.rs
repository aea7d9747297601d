mod solve_request;

pub use solve_request::{SolveJobRequest, SubmitSolveRequest};
