use async_trait::async_trait;
use scheduling_core::domain::Snapshot;
use shared::DomainResult;

/// Assembles the immutable [`Snapshot`] a solve job needs out of whatever
/// storage backs the period's staff, slots, requirements, and requests.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    async fn load(&self, period_id: i64) -> DomainResult<Snapshot>;
}
