use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Identifiable, JobStatus, Timestamped};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One request to solve a schedule period, tracked from submission through
/// completion or failure.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SolveJob {
    pub id: Uuid,
    pub period_id: i64,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Identifiable for SolveJob {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Timestamped for SolveJob {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
