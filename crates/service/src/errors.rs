use thiserror::Error;

/// Domain error taxonomy surfaced to the API boundary. The service never
/// retries or recovers; it re-raises storage signals as one of these kinds
/// and lets the boundary translate them to a response.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database integrity violation: {0}")]
    IntegrityViolation(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}
