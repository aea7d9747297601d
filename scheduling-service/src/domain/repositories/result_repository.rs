use async_trait::async_trait;
use scheduling_core::domain::{Assignment, DiagnosticItem};
use shared::DomainResult;
use uuid::Uuid;

/// Persists and reloads the output half of a solve: the assignments and
/// diagnostics a completed or failed job produced.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    async fn save(
        &self,
        job_id: Uuid,
        assignments: &[Assignment],
        diagnostics: &[DiagnosticItem],
    ) -> DomainResult<()>;

    async fn find_assignments(&self, job_id: Uuid) -> DomainResult<Vec<Assignment>>;

    async fn find_diagnostics(&self, job_id: Uuid) -> DomainResult<Vec<DiagnosticItem>>;
}
