mod solve_serializer;

pub use solve_serializer::{
    AssignmentSerialize, DiagnosticSerialize, SolveJobSerialize, SolveJobStatusSerialize,
    SolveResultSerialize,
};
