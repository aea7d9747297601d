use async_trait::async_trait;
use shared::{DomainError, DomainResult, JobStatus};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::SolveJob;
use crate::domain::repositories::SolveJobRepository;

pub struct PostgresSolveJobRepository {
    pool: PgPool,
}

impl PostgresSolveJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SolveJobRepository for PostgresSolveJobRepository {
    async fn create(&self, job: SolveJob) -> DomainResult<SolveJob> {
        sqlx::query_as::<_, SolveJob>(
            r#"
            INSERT INTO solve_jobs (id, period_id, status, error_message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, period_id, status, error_message, created_at, updated_at, completed_at
            "#,
        )
        .bind(job.id)
        .bind(job.period_id)
        .bind(job.status)
        .bind(job.error_message)
        .bind(job.created_at)
        .bind(job.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<SolveJob>> {
        sqlx::query_as::<_, SolveJob>(
            r#"
            SELECT id, period_id, status, error_message, created_at, updated_at, completed_at
            FROM solve_jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error_message: Option<String>,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE solve_jobs
            SET status = $1, error_message = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(status)
        .bind(error_message)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn mark_completed(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE solve_jobs
            SET status = $1, completed_at = NOW(), updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(JobStatus::Succeeded)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error_message: String) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE solve_jobs
            SET status = $1, error_message = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(JobStatus::Failed)
        .bind(error_message)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
