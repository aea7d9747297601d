pub mod error;
pub mod response;
pub mod types;

pub use error::{DomainError, DomainResult};
pub use response::ApiResponse;
pub use types::{Identifiable, JobStatus, Timestamped};
