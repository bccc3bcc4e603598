//! Bearer token middleware
//!
//! Guards the authenticated routes: requests must carry a valid
//! `Authorization: Bearer <token>` header or they are turned away with
//! `401 Unauthorized` and a `WWW-Authenticate` challenge. Verified claims
//! are stored as a request extension for handlers that want the caller's
//! identity.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::TokenService;

/// Reject requests without a valid bearer token.
///
/// Attach with `axum::middleware::from_fn_with_state` and a [`TokenService`].
pub async fn require_bearer(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return challenge("Bearer");
    };

    match tokens.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(error) => {
            tracing::debug!(%error, "Rejected bearer token");
            challenge(r#"Bearer error="invalid_token""#)
        }
    }
}

fn challenge(value: &'static str) -> Response {
    (StatusCode::UNAUTHORIZED, [(header::WWW_AUTHENTICATE, value)]).into_response()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::{body::Body, extract::Extension, routing::get, Router};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::Claims;

    fn service() -> TokenService {
        TokenService::new("test-secret", "catalog-api", "catalog-clients", 10)
    }

    async fn whoami(Extension(claims): Extension<Claims>) -> String {
        claims.sub
    }

    fn app(tokens: TokenService) -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(axum::middleware::from_fn_with_state(tokens, require_bearer))
    }

    #[tokio::test]
    async fn test_missing_token_is_challenged() {
        let response = app(service())
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_invalid_token_is_challenged() {
        let response = app(service())
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::AUTHORIZATION, "Bearer not-a-jwt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            r#"Bearer error="invalid_token""#
        );
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_treated_as_missing() {
        let response = app(service())
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::AUTHORIZATION, "Basic YWRhOnMzY3JldA==")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler_with_claims() {
        let tokens = service();
        let token = tokens.issue("ada").unwrap();

        let response = app(tokens)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"ada");
    }
}
