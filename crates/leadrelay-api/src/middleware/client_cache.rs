//! Short-lived client-side caching for GET/HEAD responses.
//!
//! A request whose `If-Modified-Since` falls within the cache window gets a bare
//! `304 Not Modified`. Otherwise successful responses are stamped with
//! `Last-Modified: <now>` and a matching `Cache-Control` max-age.

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Clone, Debug)]
pub struct ClientCacheConfig {
    pub max_age: Duration,
}

impl ClientCacheConfig {
    pub fn new(max_age_secs: u64) -> Self {
        Self {
            max_age: Duration::from_secs(max_age_secs),
        }
    }

    fn is_fresh(&self, since: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let Ok(window) = chrono::Duration::from_std(self.max_age) else {
            return false;
        };
        since <= now && now < since + window
    }
}

pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub async fn client_cache_middleware(
    State(config): State<Arc<ClientCacheConfig>>,
    request: Request,
    next: Next,
) -> Response {
    if config.max_age.is_zero() || !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    let now = Utc::now();
    let if_modified_since = request
        .headers()
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_http_date);

    if let Some(since) = if_modified_since {
        if config.is_fresh(since, now) {
            return StatusCode::NOT_MODIFIED.into_response();
        }
    }

    let mut response = next.run(request).await;

    if response.status().is_success() {
        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&format_http_date(now)) {
            headers.insert(header::LAST_MODIFIED, value);
        }
        if let Ok(value) =
            HeaderValue::from_str(&format!("public, max-age={}", config.max_age.as_secs()))
        {
            headers.insert(header::CACHE_CONTROL, value);
        }
    }

    response
}
