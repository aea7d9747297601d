mod api;
mod domain;
mod infrastructure;

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::state::AppState;
use infrastructure::{
    config::Settings,
    database,
    repositories::{PostgresResultRepository, PostgresSnapshotRepository, PostgresSolveJobRepository},
    JobProcessor,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheduling_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Scheduling Service...");

    let settings = Settings::new()?;
    tracing::info!("Configuration loaded: {:?}", settings);

    let db_pool =
        database::create_pool(&settings.database.url, settings.database.max_connections).await?;
    tracing::info!("Database connection pool created");

    database::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations completed");

    let snapshot_repo = Arc::new(PostgresSnapshotRepository::new(db_pool.clone()));
    let job_repo = Arc::new(PostgresSolveJobRepository::new(db_pool.clone()));
    let result_repo = Arc::new(PostgresResultRepository::new(db_pool));

    let processor = Arc::new(JobProcessor::new(
        snapshot_repo.clone(),
        job_repo.clone(),
        result_repo.clone(),
    ));
    let (job_sender, _processor_handle) = processor.start();

    let state = AppState::new(snapshot_repo, job_repo, result_repo, job_sender);

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server_address()).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Scheduling Service listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
