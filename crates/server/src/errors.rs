use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error response: `{"error": <title>, "message": <detail>}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, title: &'static str, message: impl Into<String>) -> Self {
        Self { status, title, message: message.into() }
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", format!("{what} not found"))
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::MissingField(_) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", e.to_string()),
            other => {
                error!(error = %other, "restaurant store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({"error": self.title, "message": self.message}));
        (self.status, body).into_response()
    }
}

/// Failures that abort the process before any request is served.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(anyhow::Error),
    #[error("seeding failed: {0}")]
    Seed(#[from] ServiceError),
}
