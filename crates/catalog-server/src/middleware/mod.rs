//! HTTP middleware
//!
//! CORS and tracing layers applied to the whole router, plus the two
//! admission policies that sit in front of the API routes:
//!
//! - [`FixedWindowLayer`] counts login attempts per client IP
//! - [`TokenBucketLayer`] meters authenticated traffic per bearer token
//!
//! Both reply `429 Too Many Requests` with an empty body when a request is
//! turned away. [`spawn_admission_maintenance`] runs their periodic upkeep.

pub mod fixed_window;
pub mod token_bucket;

pub use fixed_window::{Decision, FixedWindowLayer, FixedWindowPolicy};
pub use token_bucket::{Acquire, TokenBucketLayer, TokenBucketPolicy};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::task::JoinHandle;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::config::CorsConfig;

/// Build the CORS layer from configuration.
///
/// A literal `*` in the allowed origins opens the API to any origin;
/// credentials are only honored alongside explicit origins.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_LANGUAGE,
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ])
        .max_age(Duration::from_secs(3600));

    let any_origin = config.allowed_origins.iter().any(|origin| origin == "*");
    if any_origin {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    // A wildcard origin cannot be combined with credentials.
    if config.allow_credentials && !any_origin {
        layer = layer.allow_credentials(true);
    }

    layer
}

/// Request/response tracing with latency reported in microseconds
pub fn tracing_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Micros),
        )
}

/// Run periodic upkeep for both admission policies.
///
/// Every `period` the login windows drop expired partitions and the token
/// buckets replenish. The handle lives as long as the server; abort it in
/// tests that need a quiet clock.
pub fn spawn_admission_maintenance(
    login_window: Arc<FixedWindowPolicy>,
    token_buckets: Arc<TokenBucketPolicy>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let now = unix_now_secs();
            login_window.evict_expired(now);
            token_buckets.replenish(now);
            tracing::trace!(
                login_partitions = login_window.partition_count(),
                token_partitions = token_buckets.partition_count(),
                "Admission maintenance pass"
            );
        }
    })
}

/// Partition key for the login window: the peer IP, or `unknown` when the
/// listener did not record connection info
pub(crate) fn client_ip(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Partition key for the token buckets: the raw bearer token, or the empty
/// string when the header is absent or not a bearer scheme
pub(crate) fn bearer_key(request: &Request<Body>) -> String {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string()
}

/// Empty-bodied `429 Too Many Requests`
pub(crate) fn too_many_requests() -> Response {
    StatusCode::TOO_MANY_REQUESTS.into_response()
}

pub(crate) fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
