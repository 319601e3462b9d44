//! Route configuration and setup

use crate::handlers;
use crate::middleware::{
    client_cache_middleware, error_details_middleware, ClientCacheConfig, ErrorDetailsConfig,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    handler::HandlerWithoutStateExt,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use leadrelay_core::Config;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_request_size_bytes();

    // The multipart extractor enforces this cap while streaming, so oversize
    // bodies reach our error type and get the JSON 413.
    let lead_routes = Router::new()
        .route("/createlead", post(handlers::leads::create_lead))
        .layer(DefaultBodyLimit::max(body_limit));

    let static_site = ServeDir::new(config.static_path())
        .call_fallback_on_method_not_allowed(true)
        .not_found_service(handlers::fallback::not_found.into_service());

    let client_cache = Arc::new(ClientCacheConfig::new(config.client_cache_secs()));
    let error_details = Arc::new(ErrorDetailsConfig::new(!config.is_production()));

    let app = Router::new()
        .merge(lead_routes)
        .route("/health", get(handlers::health::liveness_check))
        .fallback_service(static_site)
        .layer(axum::middleware::from_fn_with_state(
            error_details,
            error_details_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            client_cache,
            client_cache_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handlers::fallback::handle_panic))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {:?}: {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
