mod postgres_result_repository;
mod postgres_snapshot_repository;
mod postgres_solve_job_repository;

pub use postgres_result_repository::PostgresResultRepository;
pub use postgres_snapshot_repository::PostgresSnapshotRepository;
pub use postgres_solve_job_repository::PostgresSolveJobRepository;
