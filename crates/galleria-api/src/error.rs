//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors and `?` so they become
//! `HttpAppError` and render consistently (status, body, logging).

use axum::{
    extract::multipart::MultipartRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use galleria_core::{AppError, ErrorMetadata, LogLevel};
use galleria_storage::StorageError;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set once at startup from `Config::is_production`.
static PRODUCTION: AtomicBool = AtomicBool::new(false);

/// Hide error details from every response body.
pub fn set_production_mode(production: bool) {
    PRODUCTION.store(production, Ordering::Relaxed);
}

fn is_production() -> bool {
    PRODUCTION.load(Ordering::Relaxed)
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Reduce file size and try again")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn from_app_error(app_error: &AppError, include_details: bool) -> Self {
        Self {
            error: app_error.client_message(),
            details: include_details.then(|| app_error.detailed_message()),
            error_type: include_details.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from galleria-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

/// Requests that are not `multipart/form-data` become a 400 in our ErrorResponse format.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(AppError::InvalidInput(format!(
            "Invalid multipart request: {}",
            rejection.body_text()
        )))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        // Details only outside production, and never for sensitive errors.
        let include_details = !is_production() && !app_error.is_sensitive();
        let body = ErrorResponse::from_app_error(app_error, include_details);

        (status, Json(body)).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::UploadFailed(msg) => AppError::BackendWriteFailed(msg),
            StorageError::ListFailed(msg) => AppError::BackendReadFailed(msg),
            StorageError::DeleteFailed(msg) => AppError::BackendReadFailed(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::BackendError(msg) => AppError::BackendReadFailed(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}
