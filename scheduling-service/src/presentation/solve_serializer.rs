use chrono::{DateTime, NaiveDate, Utc};
use scheduling_core::domain::{Assignment, DiagnosticItem};
use serde::Serialize;
use shared::JobStatus;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::entities::SolveJob;

/// Solve job response after submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct SolveJobSerialize {
    pub job_id: Uuid,
    pub period_id: i64,
    pub status: JobStatus,
}

impl From<SolveJob> for SolveJobSerialize {
    fn from(job: SolveJob) -> Self {
        Self {
            job_id: job.id,
            period_id: job.period_id,
            status: job.status,
        }
    }
}

/// Solve job status response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SolveJobStatusSerialize {
    pub job_id: Uuid,
    pub period_id: i64,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<SolveJob> for SolveJobStatusSerialize {
    fn from(job: SolveJob) -> Self {
        Self {
            job_id: job.id,
            period_id: job.period_id,
            status: job.status,
            error_message: job.error_message,
            created_at: job.created_at,
            updated_at: job.updated_at,
            completed_at: job.completed_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AssignmentSerialize {
    pub staff_id: i64,
    pub date: NaiveDate,
    pub shift_slot_id: i64,
}

impl From<Assignment> for AssignmentSerialize {
    fn from(a: Assignment) -> Self {
        Self {
            staff_id: a.staff_id,
            date: a.date,
            shift_slot_id: a.shift_slot_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiagnosticSerialize {
    pub constraint_tag: String,
    pub severity: String,
    pub message: String,
}

impl From<DiagnosticItem> for DiagnosticSerialize {
    fn from(d: DiagnosticItem) -> Self {
        Self {
            constraint_tag: d.constraint_tag,
            severity: d.severity.as_str().to_string(),
            message: d.message,
        }
    }
}

/// Complete solve result response.
#[derive(Debug, Serialize, ToSchema)]
pub struct SolveResultSerialize {
    pub job_id: Uuid,
    pub period_id: i64,
    pub status: JobStatus,
    pub assignments: Vec<AssignmentSerialize>,
    pub diagnostics: Vec<DiagnosticSerialize>,
}
