use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("MILP backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("MILP backend failed: {0}")]
    BackendFailure(String),

    #[error("failed to build model: {0}")]
    ModelBuildFailure(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
