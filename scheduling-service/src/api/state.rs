use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::requests::SolveJobRequest;
use crate::domain::repositories::{ResultRepository, SnapshotRepository, SolveJobRepository};

#[derive(Clone)]
pub struct AppState {
    pub snapshot_repo: Arc<dyn SnapshotRepository>,
    pub job_repo: Arc<dyn SolveJobRepository>,
    pub result_repo: Arc<dyn ResultRepository>,
    pub job_sender: mpsc::Sender<SolveJobRequest>,
}

impl AppState {
    pub fn new(
        snapshot_repo: Arc<dyn SnapshotRepository>,
        job_repo: Arc<dyn SolveJobRepository>,
        result_repo: Arc<dyn ResultRepository>,
        job_sender: mpsc::Sender<SolveJobRequest>,
    ) -> Self {
        Self {
            snapshot_repo,
            job_repo,
            result_repo,
            job_sender,
        }
    }
}
