use async_trait::async_trait;
use shared::{DomainResult, JobStatus};
use uuid::Uuid;

use crate::domain::entities::SolveJob;

#[async_trait]
pub trait SolveJobRepository: Send + Sync {
    async fn create(&self, job: SolveJob) -> DomainResult<SolveJob>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<SolveJob>>;

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error_message: Option<String>,
    ) -> DomainResult<()>;

    async fn mark_completed(&self, id: Uuid) -> DomainResult<()>;

    async fn mark_failed(&self, id: Uuid, error_message: String) -> DomainResult<()>;
}
