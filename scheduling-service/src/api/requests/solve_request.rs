use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Body of a solve submission. Empty today, kept as a struct so the endpoint
/// can grow request-scoped overrides (e.g. a one-off time limit) without a
/// breaking signature change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitSolveRequest {}

#[derive(Debug, Clone)]
pub struct SolveJobRequest {
    pub job_id: Uuid,
    pub period_id: i64,
}
