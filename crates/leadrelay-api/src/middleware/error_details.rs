//! Adds the full error text to failure bodies outside production.
//!
//! Handlers and extractors render errors without details and attach an
//! [`ErrorDetails`] extension for non-sensitive ones; this layer re-renders the
//! body with `details` filled in when the configuration allows it.

use crate::error::ErrorDetails;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ErrorDetailsConfig {
    pub expose: bool,
}

impl ErrorDetailsConfig {
    pub fn new(expose: bool) -> Self {
        Self { expose }
    }
}

pub async fn error_details_middleware(
    State(config): State<Arc<ErrorDetailsConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if !config.expose {
        return response;
    }

    let Some(ErrorDetails { mut body, details }) =
        response.extensions().get::<ErrorDetails>().cloned()
    else {
        return response;
    };

    body.details = Some(details);
    (response.status(), Json(body)).into_response()
}
