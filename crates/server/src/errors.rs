use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use service::errors::ServiceError;

/// Wire form of every failed request.
#[derive(Debug, Serialize)]
pub struct StandardError {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
    path: String,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        error: &'static str,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn internal(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            message,
            path,
        )
    }

    /// The domain-to-HTTP translation table. Everything the service raises
    /// lands here; nothing is retried or recovered.
    pub fn from_service(e: ServiceError, path: &str) -> Self {
        match e {
            ServiceError::NotFound(msg) => {
                Self::new(StatusCode::NOT_FOUND, "Resource not found", msg, path)
            }
            ServiceError::IntegrityViolation(msg) => Self::new(
                StatusCode::CONFLICT,
                "Database integrity violation",
                msg,
                path,
            ),
            ServiceError::Validation(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation error", msg, path)
            }
            ServiceError::Model(models::errors::ModelError::Validation(msg)) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation error", msg, path)
            }
            ServiceError::Model(models::errors::ModelError::Db(msg))
            | ServiceError::Db(msg) => {
                error!(err = %msg, "storage failure");
                Self::internal(msg, path)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = StandardError {
            timestamp: Utc::now(),
            status: self.status.as_u16(),
            error: self.error.to_string(),
            message: self.message,
            path: self.path,
        };
        (self.status, Json(body)).into_response()
    }
}
