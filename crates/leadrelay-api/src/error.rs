//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or types that implement `Into<AppError>`) for errors and `?` so they
//! become `HttpAppError` and render consistently (status, body, logging).

use crate::response::LeadResponse;
use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leadrelay_core::{AppError, ErrorMetadata, LogLevel};
use leadrelay_storage::StorageError;

/// Client message for bodies over `MAX_REQUEST_SIZE_MB`.
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request body exceeds the configured size limit";

/// Display text of `http_body_util::LengthLimitError`, raised by the body cap
/// and surfaced by multer only as an opaque stream failure.
const LENGTH_LIMIT_EXCEEDED: &str = "length limit exceeded";

/// Failure body plus the full error text, attached to the response extensions of
/// non-sensitive errors. `middleware::error_details` decides whether it is shown.
#[derive(Clone, Debug)]
pub struct ErrorDetails {
    pub body: LeadResponse,
    pub details: String,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from leadrelay-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::Internal(format!("{:#}", err)))
    }
}

/// Whether the body size cap shows up anywhere in the error's source chain.
fn hit_length_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(err) = current {
        if err.to_string() == LENGTH_LIMIT_EXCEEDED {
            return true;
        }
        current = err.source();
    }
    false
}

/// Map a multipart failure to 413 when the body hit the size cap, 400 otherwise.
fn multipart_failure(status: StatusCode, too_large: bool, body_text: String) -> AppError {
    if too_large || status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(PAYLOAD_TOO_LARGE_MESSAGE.to_string())
    } else {
        AppError::Validation(body_text)
    }
}

/// Missing or wrong content-type, or a bad boundary.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        let too_large = hit_length_limit(&rejection);
        HttpAppError(multipart_failure(
            rejection.status(),
            too_large,
            rejection.body_text(),
        ))
    }
}

/// Failures while reading the multipart stream (malformed encoding, size cap).
impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let too_large = hit_length_limit(&err);
        HttpAppError(multipart_failure(err.status(), too_large, err.body_text()))
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::InvalidFilename(msg)
            | StorageError::CreateFailed(msg)
            | StorageError::WriteFailed(msg)
            | StorageError::ReadFailed(msg)
            | StorageError::ConfigError(msg) => AppError::Storage(msg),
            StorageError::NotFound(path) => {
                AppError::Storage(format!("Staged file disappeared: {}", path))
            }
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, code, "Request failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, code, "Request failed");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = LeadResponse::failure(status.as_u16(), app_error.client_message(), None);

        // Sensitive errors never carry details.
        let details = (!app_error.is_sensitive()).then(|| ErrorDetails {
            body: body.clone(),
            details: app_error.to_string(),
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(details) = details {
            response.extensions_mut().insert(details);
        }
        response
    }
}
