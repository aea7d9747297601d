mod solve_handlers;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

pub use solve_handlers::{get_solve_job_result, get_solve_job_status, submit_solve_job};

/// Health check handler
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
