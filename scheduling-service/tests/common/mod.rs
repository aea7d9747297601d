use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use scheduling_core::domain::{
    Assignment, DiagnosticItem, PeriodStatus, SchedulePeriod, Snapshot, SolverConfig,
};
use scheduling_service::api::requests::SolveJobRequest;
use scheduling_service::api::AppState;
use scheduling_service::domain::entities::SolveJob;
use scheduling_service::domain::repositories::{
    ResultRepository, SnapshotRepository, SolveJobRepository,
};
use shared::{DomainError, DomainResult, JobStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Manual mock implementation for SnapshotRepository
#[derive(Default)]
pub struct MockSnapshotRepository {
    periods: RwLock<HashMap<i64, Snapshot>>,
}

impl MockSnapshotRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_periods(snapshots: Vec<Snapshot>) -> Self {
        let repo = Self::new();
        {
            let mut periods = repo.periods.write().unwrap();
            for snapshot in snapshots {
                periods.insert(snapshot.period.id, snapshot);
            }
        }
        repo
    }
}

#[async_trait]
impl SnapshotRepository for MockSnapshotRepository {
    async fn load(&self, period_id: i64) -> DomainResult<Snapshot> {
        self.periods
            .read()
            .unwrap()
            .get(&period_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("period {} not found", period_id)))
    }
}

/// Manual mock implementation for SolveJobRepository
#[derive(Default)]
pub struct MockSolveJobRepository {
    jobs: RwLock<HashMap<Uuid, SolveJob>>,
}

impl MockSolveJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(job_list: Vec<SolveJob>) -> Self {
        let repo = Self::new();
        {
            let mut jobs = repo.jobs.write().unwrap();
            for job in job_list {
                jobs.insert(job.id, job);
            }
        }
        repo
    }
}

#[async_trait]
impl SolveJobRepository for MockSolveJobRepository {
    async fn create(&self, job: SolveJob) -> DomainResult<SolveJob> {
        self.jobs.write().unwrap().insert(job.id, job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<SolveJob>> {
        Ok(self.jobs.read().unwrap().get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error_message: Option<String>,
    ) -> DomainResult<()> {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(job) = jobs.get_mut(&id) {
            job.status = status;
            job.error_message = error_message;
            job.updated_at = Utc::now();
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("Job {} not found", id)))
        }
    }

    async fn mark_completed(&self, id: Uuid) -> DomainResult<()> {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(job) = jobs.get_mut(&id) {
            job.status = JobStatus::Succeeded;
            job.completed_at = Some(Utc::now());
            job.updated_at = Utc::now();
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("Job {} not found", id)))
        }
    }

    async fn mark_failed(&self, id: Uuid, error_message: String) -> DomainResult<()> {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(job) = jobs.get_mut(&id) {
            job.status = JobStatus::Failed;
            job.error_message = Some(error_message);
            job.updated_at = Utc::now();
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("Job {} not found", id)))
        }
    }
}

/// Manual mock implementation for ResultRepository
#[derive(Default)]
pub struct MockResultRepository {
    assignments: RwLock<HashMap<Uuid, Vec<Assignment>>>,
    diagnostics: RwLock<HashMap<Uuid, Vec<DiagnosticItem>>>,
}

impl MockResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(job_id: Uuid, assignments: Vec<Assignment>) -> Self {
        let repo = Self::new();
        repo.assignments.write().unwrap().insert(job_id, assignments);
        repo
    }
}

#[async_trait]
impl ResultRepository for MockResultRepository {
    async fn save(
        &self,
        job_id: Uuid,
        assignments: &[Assignment],
        diagnostics: &[DiagnosticItem],
    ) -> DomainResult<()> {
        self.assignments
            .write()
            .unwrap()
            .insert(job_id, assignments.to_vec());
        self.diagnostics
            .write()
            .unwrap()
            .insert(job_id, diagnostics.to_vec());
        Ok(())
    }

    async fn find_assignments(&self, job_id: Uuid) -> DomainResult<Vec<Assignment>> {
        Ok(self
            .assignments
            .read()
            .unwrap()
            .get(&job_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn find_diagnostics(&self, job_id: Uuid) -> DomainResult<Vec<DiagnosticItem>> {
        Ok(self
            .diagnostics
            .read()
            .unwrap()
            .get(&job_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Create test app state with mock repositories and a dummy channel
pub fn create_test_app_state(
    snapshot_repo: Arc<dyn SnapshotRepository>,
    job_repo: Arc<dyn SolveJobRepository>,
    result_repo: Arc<dyn ResultRepository>,
) -> (AppState, mpsc::Receiver<SolveJobRequest>) {
    let (sender, receiver) = mpsc::channel::<SolveJobRequest>(100);
    let state = AppState::new(snapshot_repo, job_repo, result_repo, sender);
    (state, receiver)
}

/// Struct to hold test server and keep the job-request receiver alive.
pub struct TestServerWithReceiver {
    pub server: axum_test::TestServer,
    #[allow(dead_code)]
    pub receiver: mpsc::Receiver<SolveJobRequest>,
}

pub fn get_test_period_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, 9).unwrap() // a Monday
}

/// A minimal but solvable snapshot: one staff member, one slot, a three-day period.
pub fn create_sample_snapshot(period_id: i64) -> Snapshot {
    let start = get_test_period_start();
    Snapshot {
        period: SchedulePeriod {
            id: period_id,
            start_date: start,
            end_date: start + chrono::Duration::days(2),
            status: PeriodStatus::Draft,
        },
        staff: vec![],
        slots: vec![],
        requirements: vec![],
        role_requirements: vec![],
        requests: vec![],
        config: SolverConfig::default(),
        prefix_assignments: vec![],
    }
}

pub fn create_sample_job(id: Uuid, period_id: i64, status: JobStatus) -> SolveJob {
    let now = Utc::now();
    SolveJob {
        id,
        period_id,
        status,
        error_message: None,
        created_at: now,
        updated_at: now,
        completed_at: None,
    }
}

pub fn create_completed_job(id: Uuid, period_id: i64) -> SolveJob {
    let now = Utc::now();
    SolveJob {
        id,
        period_id,
        status: JobStatus::Succeeded,
        error_message: None,
        created_at: now,
        updated_at: now,
        completed_at: Some(now),
    }
}

pub fn create_sample_assignments(staff_ids: Vec<i64>, start_date: NaiveDate) -> Vec<Assignment> {
    let mut assignments = Vec::new();
    for staff_id in staff_ids {
        for day in 0..3 {
            assignments.push(Assignment {
                staff_id,
                date: start_date + chrono::Duration::days(day),
                shift_slot_id: 1,
            });
        }
    }
    assignments
}
