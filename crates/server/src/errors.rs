use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{error, warn};

use service::auth::errors::AuthError;
use service::errors::ServiceError;
use service::storage::StorageError;

/// JSON error body `{"error": title, "message": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(detail.into()))
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, title = self.title, detail = ?self.detail, "request failed");
        }
        let body = serde_json::json!({ "error": self.title, "message": self.detail });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let detail = Some(e.to_string());
        match &e {
            _ if e.is_client_error() => {
                if let ServiceError::Storage(StorageError::Rejected(msg)) = &e {
                    if msg.starts_with("file too large") {
                        return Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large", detail);
                    }
                }
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", detail)
            }
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg.clone())),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg.clone())),
            ServiceError::Db(msg) if msg.contains("duplicate key") => {
                warn!(error = %msg, "unique constraint violated");
                Self::new(StatusCode::CONFLICT, "Conflict", Some("a record with this name already exists".into()))
            }
            ServiceError::Model(models::errors::ModelError::Db(msg)) if msg.contains("duplicate key") => {
                Self::new(StatusCode::CONFLICT, "Conflict", Some("a record with this name already exists".into()))
            }
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", detail),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            AuthError::Conflict => Self::new(StatusCode::CONFLICT, "Conflict", Some(e.to_string())),
            AuthError::Unauthorized => {
                Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(e.to_string()))
            }
            other => {
                error!(code = other.code(), error = %other, "auth failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", None)
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status() {
        let cases = [
            (ServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("city"), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("children".into()), StatusCode::CONFLICT),
            (ServiceError::Db("connection reset".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::Db("duplicate key value violates unique constraint".into()), StatusCode::CONFLICT),
            (ServiceError::Storage(StorageError::Rejected("file too large (9 > 5 bytes)".into())), StatusCode::PAYLOAD_TOO_LARGE),
            (ServiceError::Storage(StorageError::Rejected("unsupported content type".into())), StatusCode::BAD_REQUEST),
            (ServiceError::Storage(StorageError::Io("disk full".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn auth_errors_hide_internals() {
        let e = JsonApiError::from(AuthError::HashError("argon2 params".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(e.detail.is_none());
        assert_eq!(JsonApiError::from(AuthError::Unauthorized).status, StatusCode::UNAUTHORIZED);
    }
}
