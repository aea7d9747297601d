use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use shared::{ApiResponse, DomainError, JobStatus};
use uuid::Uuid;

use crate::api::requests::{SolveJobRequest, SubmitSolveRequest};
use crate::api::state::AppState;
use crate::domain::entities::SolveJob;
use crate::presentation::{SolveJobSerialize, SolveJobStatusSerialize, SolveResultSerialize};

fn map_domain_error(e: DomainError) -> (StatusCode, String) {
    match e {
        DomainError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        DomainError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

/// Submit a solve job for a schedule period.
#[utoipa::path(
    post,
    path = "/api/v1/periods/{period_id}/solve",
    request_body = SubmitSolveRequest,
    params(
        ("period_id" = i64, Path, description = "Schedule period ID")
    ),
    responses(
        (status = 202, description = "Solve job accepted for processing", body = SolveJobSerialize),
        (status = 404, description = "Schedule period not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "solve"
)]
pub async fn submit_solve_job(
    State(state): State<AppState>,
    Path(period_id): Path<i64>,
    Json(_request): Json<SubmitSolveRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // Fail fast if the period doesn't exist rather than queueing a doomed job.
    state
        .snapshot_repo
        .load(period_id)
        .await
        .map_err(map_domain_error)?;

    let job_id = Uuid::new_v4();
    let now = Utc::now();

    let job = SolveJob {
        id: job_id,
        period_id,
        status: JobStatus::Pending,
        error_message: None,
        created_at: now,
        updated_at: now,
        completed_at: None,
    };

    let created_job = state
        .job_repo
        .create(job)
        .await
        .map_err(map_domain_error)?;

    state
        .job_sender
        .send(SolveJobRequest {
            job_id: created_job.id,
            period_id: created_job.period_id,
        })
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to queue solve job: {e}"),
            )
        })?;

    let response = ApiResponse::success(
        "Solve job accepted for processing",
        SolveJobSerialize::from(created_job),
    );

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Get the status of a solve job.
#[utoipa::path(
    get,
    path = "/api/v1/solve-jobs/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Solve job ID")
    ),
    responses(
        (status = 200, description = "Solve job status retrieved", body = SolveJobStatusSerialize),
        (status = 404, description = "Solve job not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "solve"
)]
pub async fn get_solve_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let job = state
        .job_repo
        .find_by_id(job_id)
        .await
        .map_err(map_domain_error)?
        .ok_or((StatusCode::NOT_FOUND, "solve job not found".to_string()))?;

    let response = ApiResponse::success(
        "Solve job status retrieved",
        SolveJobStatusSerialize::from(job),
    );

    Ok((StatusCode::OK, Json(response)))
}

/// Get the result of a completed solve job.
#[utoipa::path(
    get,
    path = "/api/v1/solve-jobs/{job_id}/result",
    params(
        ("job_id" = Uuid, Path, description = "Solve job ID")
    ),
    responses(
        (status = 200, description = "Solve result retrieved", body = SolveResultSerialize),
        (status = 404, description = "Solve job not found"),
        (status = 400, description = "Solve job not completed yet"),
        (status = 500, description = "Internal server error")
    ),
    tag = "solve"
)]
pub async fn get_solve_job_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let job = state
        .job_repo
        .find_by_id(job_id)
        .await
        .map_err(map_domain_error)?
        .ok_or((StatusCode::NOT_FOUND, "solve job not found".to_string()))?;

    if job.status != JobStatus::Succeeded && job.status != JobStatus::Failed {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("solve job is not finished yet, current status: {:?}", job.status),
        ));
    }

    let assignments = state
        .result_repo
        .find_assignments(job_id)
        .await
        .map_err(map_domain_error)?;

    let diagnostics = state
        .result_repo
        .find_diagnostics(job_id)
        .await
        .map_err(map_domain_error)?;

    let result = SolveResultSerialize {
        job_id: job.id,
        period_id: job.period_id,
        status: job.status,
        assignments: assignments.into_iter().map(Into::into).collect(),
        diagnostics: diagnostics.into_iter().map(Into::into).collect(),
    };
    let response = ApiResponse::success("Solve result retrieved", result);

    Ok((StatusCode::OK, Json(response)))
}
