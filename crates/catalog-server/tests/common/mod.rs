//! Shared helpers for the integration suites
//!
//! Every suite runs the real `/api/v1` router (admission layers, bearer
//! guard, feature routes) over the in-memory catalog double, so requests
//! exercise the full HTTP stack without a database.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use catalog_server::features;
use catalog_server::features::shared::test_helpers::{test_state, InMemoryCatalog};
use catalog_server::middleware::{FixedWindowPolicy, TokenBucketPolicy};

pub struct TestApp {
    pub router: Router,
    pub catalog: Arc<InMemoryCatalog>,
    pub login_window: Arc<FixedWindowPolicy>,
    pub token_buckets: Arc<TokenBucketPolicy>,
}

/// App with roomy default policies that stay out of the way
pub fn app(catalog: Arc<InMemoryCatalog>) -> TestApp {
    app_with_policies(
        catalog,
        FixedWindowPolicy::new(5, 300),
        TokenBucketPolicy::new(10, 5, 5, 3600),
    )
}

/// App with explicit admission policies, for the admission suites
pub fn app_with_policies(
    catalog: Arc<InMemoryCatalog>,
    login_window: FixedWindowPolicy,
    token_buckets: TokenBucketPolicy,
) -> TestApp {
    let login_window = Arc::new(login_window);
    let token_buckets = Arc::new(token_buckets);
    let router = Router::new().nest(
        "/api/v1",
        features::router(
            test_state(catalog.clone()),
            login_window.clone(),
            token_buckets.clone(),
        ),
    );

    TestApp {
        router,
        catalog,
        login_window,
        token_buckets,
    }
}

/// Build a request, optionally with a bearer token and a JSON body
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Stamp the connection info the per-IP login window partitions by
pub fn with_ip(mut request: Request<Body>, octets: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((octets, 40000))));
    request
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send and decode the body; an empty body decodes to `Value::Null`
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send_json(json_request(
            "POST",
            "/api/v1/login",
            None,
            Some(json!({ "username": username, "password": password })),
        ))
        .await
    }

    /// Log in and pull out the issued token, failing loudly if refused
    pub async fn bearer_token(&self, username: &str, password: &str) -> String {
        let (status, body) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }
}
