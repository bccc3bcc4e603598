//! Fixed-window admission policy
//!
//! Counts requests per partition key inside aligned wall-clock windows:
//! window `n` covers `[n * window_secs, (n + 1) * window_secs)`. The first
//! `permit_limit` requests of a window pass, the rest are rejected until the
//! next window starts. There is no queueing; a rejected caller simply tries
//! again later.
//!
//! The login route partitions by client IP, so one address hammering the
//! password check cannot starve others.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use axum::{body::Body, http::Request, response::Response};
use tower::{Layer, Service};

use super::{client_ip, too_many_requests, unix_now_secs};

/// Outcome of a fixed-window admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Reject,
}

#[derive(Debug)]
struct WindowState {
    /// Aligned window index the count belongs to
    window: u64,
    count: u32,
}

/// Per-key fixed-window counters.
///
/// Interior mutability uses a std `Mutex`; the critical sections never await.
#[derive(Debug)]
pub struct FixedWindowPolicy {
    permit_limit: u32,
    window_secs: u64,
    partitions: Mutex<HashMap<String, WindowState>>,
}

impl FixedWindowPolicy {
    pub fn new(permit_limit: u32, window_secs: u64) -> Self {
        Self {
            permit_limit,
            window_secs: window_secs.max(1),
            partitions: Mutex::new(HashMap::new()),
        }
    }

    /// Count a request for `key` at `now_secs` and decide its fate.
    ///
    /// A key's counter resets the moment `now_secs` crosses into a new
    /// aligned window; stale counts from earlier windows never linger.
    pub fn check(&self, key: &str, now_secs: u64) -> Decision {
        let window = now_secs / self.window_secs;
        let mut partitions = self
            .partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let state = partitions
            .entry(key.to_string())
            .or_insert(WindowState { window, count: 0 });
        if state.window != window {
            state.window = window;
            state.count = 0;
        }

        if state.count < self.permit_limit {
            state.count += 1;
            Decision::Allow
        } else {
            Decision::Reject
        }
    }

    /// Drop partitions whose window has already passed
    pub fn evict_expired(&self, now_secs: u64) {
        let window = now_secs / self.window_secs;
        self.partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, state| state.window == window);
    }

    /// Number of partition keys currently tracked
    pub fn partition_count(&self) -> usize {
        self.partitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

// ============================================================================
// Tower layer
// ============================================================================

/// Applies a [`FixedWindowPolicy`] keyed by client IP
#[derive(Clone)]
pub struct FixedWindowLayer {
    policy: Arc<FixedWindowPolicy>,
}

impl FixedWindowLayer {
    pub fn new(policy: Arc<FixedWindowPolicy>) -> Self {
        Self { policy }
    }
}

impl<S> Layer<S> for FixedWindowLayer {
    type Service = FixedWindowService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        FixedWindowService {
            inner,
            policy: self.policy.clone(),
        }
    }
}

#[derive(Clone)]
pub struct FixedWindowService<S> {
    inner: S,
    policy: Arc<FixedWindowPolicy>,
}

impl<S> Service<Request<Body>> for FixedWindowService<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let policy = self.policy.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let key = client_ip(&request);
            match policy.check(&key, unix_now_secs()) {
                Decision::Allow => inner.call(request).await,
                Decision::Reject => {
                    tracing::warn!(client = %key, "Rejected request over the window limit");
                    Ok(too_many_requests())
                }
            }
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::{http::StatusCode, routing::post, Router};
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn test_allows_up_to_the_permit_limit() {
        let policy = FixedWindowPolicy::new(3, 60);

        for _ in 0..3 {
            assert_eq!(policy.check("10.0.0.1", 100), Decision::Allow);
        }
        assert_eq!(policy.check("10.0.0.1", 100), Decision::Reject);
    }

    #[test]
    fn test_counter_resets_in_the_next_window() {
        let policy = FixedWindowPolicy::new(1, 60);

        assert_eq!(policy.check("10.0.0.1", 100), Decision::Allow);
        assert_eq!(policy.check("10.0.0.1", 119), Decision::Reject);
        // 120 starts window index 2.
        assert_eq!(policy.check("10.0.0.1", 120), Decision::Allow);
    }

    #[test]
    fn test_windows_are_aligned_not_sliding() {
        let policy = FixedWindowPolicy::new(1, 60);

        // 59 and 60 are one second apart but fall in different windows.
        assert_eq!(policy.check("10.0.0.1", 59), Decision::Allow);
        assert_eq!(policy.check("10.0.0.1", 60), Decision::Allow);
    }

    #[test]
    fn test_keys_are_isolated() {
        let policy = FixedWindowPolicy::new(1, 60);

        assert_eq!(policy.check("10.0.0.1", 100), Decision::Allow);
        assert_eq!(policy.check("10.0.0.1", 100), Decision::Reject);
        assert_eq!(policy.check("10.0.0.2", 100), Decision::Allow);
    }

    #[test]
    fn test_evict_drops_only_past_windows() {
        let policy = FixedWindowPolicy::new(5, 60);

        policy.check("old", 100);
        policy.check("current", 200);
        policy.evict_expired(200);

        assert_eq!(policy.partition_count(), 1);
    }

    #[tokio::test]
    async fn test_layer_rejects_with_429_and_empty_body() {
        let app = Router::new()
            .route("/login", post(|| async { StatusCode::OK }))
            .layer(FixedWindowLayer::new(Arc::new(FixedWindowPolicy::new(1, 3600))));

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = axum::body::to_bytes(second.into_body(), 1024).await.unwrap();
        assert!(body.is_empty());
    }
}
