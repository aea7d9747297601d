use async_trait::async_trait;
use scheduling_core::domain::{Assignment, DiagnosticItem, Severity};
use shared::{DomainError, DomainResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

pub struct PostgresResultRepository {
    pool: PgPool,
}

impl PostgresResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AssignmentRow {
    staff_id: i64,
    date: chrono::NaiveDate,
    shift_slot_id: i64,
}

impl From<AssignmentRow> for Assignment {
    fn from(row: AssignmentRow) -> Self {
        Assignment {
            staff_id: row.staff_id,
            date: row.date,
            shift_slot_id: row.shift_slot_id,
        }
    }
}

#[derive(FromRow)]
struct DiagnosticRow {
    constraint_tag: String,
    severity: String,
    message: String,
}

impl TryFrom<DiagnosticRow> for DiagnosticItem {
    type Error = DomainError;

    fn try_from(row: DiagnosticRow) -> Result<Self, Self::Error> {
        let severity = match row.severity.as_str() {
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            other => {
                return Err(DomainError::DatabaseError(format!(
                    "unknown diagnostic severity '{other}'"
                )))
            }
        };
        Ok(DiagnosticItem {
            constraint_tag: row.constraint_tag,
            severity,
            message: row.message,
        })
    }
}

#[async_trait]
impl crate::domain::repositories::ResultRepository for PostgresResultRepository {
    async fn save(
        &self,
        job_id: Uuid,
        assignments: &[Assignment],
        diagnostics: &[DiagnosticItem],
    ) -> DomainResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        for a in assignments {
            sqlx::query(
                "INSERT INTO assignments (job_id, staff_id, date, shift_slot_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(job_id)
            .bind(a.staff_id)
            .bind(a.date)
            .bind(a.shift_slot_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        }

        for d in diagnostics {
            sqlx::query(
                "INSERT INTO diagnostics (job_id, constraint_tag, severity, message) VALUES ($1, $2, $3, $4)",
            )
            .bind(job_id)
            .bind(&d.constraint_tag)
            .bind(d.severity.as_str())
            .bind(&d.message)
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))
    }

    async fn find_assignments(&self, job_id: Uuid) -> DomainResult<Vec<Assignment>> {
        let rows: Vec<AssignmentRow> = sqlx::query_as(
            "SELECT staff_id, date, shift_slot_id FROM assignments WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    async fn find_diagnostics(&self, job_id: Uuid) -> DomainResult<Vec<DiagnosticItem>> {
        let rows: Vec<DiagnosticRow> = sqlx::query_as(
            "SELECT constraint_tag, severity, message FROM diagnostics WHERE job_id = $1",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(DiagnosticItem::try_from).collect()
    }
}
