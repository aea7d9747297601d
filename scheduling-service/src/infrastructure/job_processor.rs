use std::sync::Arc;

use scheduling_core::domain::SolveStatus;
use shared::{DomainError, DomainResult, JobStatus};
use tokio::sync::mpsc;

use crate::api::requests::SolveJobRequest;
use crate::domain::repositories::{ResultRepository, SnapshotRepository, SolveJobRepository};

pub struct JobProcessor {
    snapshot_repo: Arc<dyn SnapshotRepository>,
    job_repo: Arc<dyn SolveJobRepository>,
    result_repo: Arc<dyn ResultRepository>,
}

impl JobProcessor {
    pub fn new(
        snapshot_repo: Arc<dyn SnapshotRepository>,
        job_repo: Arc<dyn SolveJobRepository>,
        result_repo: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            snapshot_repo,
            job_repo,
            result_repo,
        }
    }

    pub fn start(
        self: Arc<Self>,
    ) -> (mpsc::Sender<SolveJobRequest>, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<SolveJobRequest>(100);

        let handle = tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                if let Err(e) = self.process_job(&request).await {
                    tracing::error!("Failed to process solve job {}: {:?}", request.job_id, e);
                }
            }
        });

        (tx, handle)
    }

    async fn process_job(&self, request: &SolveJobRequest) -> DomainResult<()> {
        tracing::info!("Processing solve job {}", request.job_id);

        self.job_repo
            .update_status(request.job_id, JobStatus::Running, None)
            .await?;

        match self.run_solve(request).await {
            Ok(()) => {
                self.job_repo.mark_completed(request.job_id).await?;
                tracing::info!("Solve job {} completed", request.job_id);
                Ok(())
            }
            Err(e) => {
                let error_message = e.to_string();
                self.job_repo
                    .mark_failed(request.job_id, error_message.clone())
                    .await?;
                tracing::error!("Solve job {} failed: {}", request.job_id, error_message);
                Err(e)
            }
        }
    }

    async fn run_solve(&self, request: &SolveJobRequest) -> DomainResult<()> {
        let snapshot = self.snapshot_repo.load(request.period_id).await?;

        let result = tokio::task::spawn_blocking(move || {
            let backend = scheduling_core::solver::HighsBackend::default();
            scheduling_core::orchestrator::solve(&snapshot, &backend)
        })
        .await
        .map_err(|e| DomainError::InternalError(format!("solver task panicked: {e}")))?
        .map_err(|e| DomainError::InternalError(e.to_string()))?;

        if result.status == SolveStatus::Infeasible {
            tracing::warn!(
                "Solve job {} came back infeasible: {}",
                request.job_id,
                result.message
            );
        }

        self.result_repo
            .save(request.job_id, &result.assignments, &result.diagnostics)
            .await
    }
}
