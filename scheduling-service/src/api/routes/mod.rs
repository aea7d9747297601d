use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::api::requests::SubmitSolveRequest;
use crate::api::state::AppState;
use crate::presentation::{
    AssignmentSerialize, DiagnosticSerialize, SolveJobSerialize, SolveJobStatusSerialize,
    SolveResultSerialize,
};
use shared::JobStatus;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scheduling Service API",
        version = "1.0.0",
        description = "Asynchronous shift-schedule solving API"
    ),
    paths(
        crate::api::handlers::submit_solve_job,
        crate::api::handlers::get_solve_job_status,
        crate::api::handlers::get_solve_job_result,
    ),
    components(schemas(
        SubmitSolveRequest,
        SolveJobSerialize,
        SolveJobStatusSerialize,
        SolveResultSerialize,
        AssignmentSerialize,
        DiagnosticSerialize,
        JobStatus,
    ))
)]
struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route("/periods/:period_id/solve", post(handlers::submit_solve_job))
        .route("/solve-jobs/:job_id", get(handlers::get_solve_job_status))
        .route(
            "/solve-jobs/:job_id/result",
            get(handlers::get_solve_job_result),
        )
        .route("/health", get(handlers::health_check));

    Router::new()
        .nest("/api/v1", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
