use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::errors::AuthError;

/// API error type with HTTP status code and a problem body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: String,
    pub entity: Option<String>,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, title: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            title,
            detail: detail.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAM", detail)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "PERMISSION_ERROR", detail)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", detail)
    }

    /// Creates a 500 Internal Server Error; the detail is never shown to clients
    pub fn internal_server_error() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "SERVER_ERROR",
            "internal server error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "title": self.title,
            "detail": self.detail,
            "entity": self.entity,
        }));

        (self.status, body).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidParameter { field, reason } => {
                Self::bad_request(reason).with_entity(field)
            }
            AuthError::NotFound(resource) => {
                Self::not_found(format!("{} not found", resource)).with_entity(resource)
            }
            AuthError::Permission(reason) => Self::unauthorized(reason),
            err @ AuthError::Server { .. } => {
                tracing::error!(error = %err, "request failed");
                Self::internal_server_error()
            }
        }
    }
}
