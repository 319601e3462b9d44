//! Plain-text pages for unknown routes and panicking handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::any::Any;

pub const NOT_FOUND_BODY: &str = "Ooops. 404 error";
pub const INTERNAL_ERROR_BODY: &str = "Oups something went wrong, try again";

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

/// Response for a handler that panicked.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
}
