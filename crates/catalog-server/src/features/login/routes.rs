//! Login API route
//!
//! # Route Structure
//!
//! - `POST /api/v1/login` - Exchange username and password for a bearer token
//!
//! This is the only route outside the bearer guard; it sits behind the
//! per-IP fixed window instead, so repeated credential guessing from one
//! address is cut off. See [`crate::features::router`].

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::response::ErrorResponse;
use crate::features::shared::validation::{
    validate_text, FieldViolation, MAX_CREDENTIAL_LENGTH,
};
use crate::features::FeatureState;

use super::commands::{LoginCommand, LoginError};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the login router
pub fn login_routes() -> Router<FeatureState> {
    Router::new().route("/", post(login))
}

// ============================================================================
// Request Bodies
// ============================================================================

/// Request body for `POST /api/v1/login`
#[derive(Debug, Deserialize)]
struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

impl LoginRequest {
    /// Validate the payload, collecting every violation before giving up
    fn into_command(self) -> Result<LoginCommand, Vec<FieldViolation>> {
        let username = self.username.unwrap_or_default();
        let password = self.password.unwrap_or_default();
        let mut violations = Vec::new();

        if let Err(error) = validate_text("username", &username, MAX_CREDENTIAL_LENGTH) {
            violations.push(FieldViolation::new("username", error));
        }
        if let Err(error) = validate_text("password", &password, MAX_CREDENTIAL_LENGTH) {
            violations.push(FieldViolation::new("password", error));
        }

        if violations.is_empty() {
            Ok(LoginCommand { username, password })
        } else {
            Err(violations)
        }
    }
}

// ============================================================================
// Handler
// ============================================================================

/// Authenticate and issue a bearer token
///
/// # Endpoint
///
/// `POST /api/v1/login`
///
/// # Request Body
///
/// ```json
/// { "username": "ada", "password": "s3cret" }
/// ```
///
/// # Response
///
/// - `200 OK` - Credentials accepted; body carries the profile and token
/// - `400 Bad Request` - Validation error, or the password was wrong
/// - `404 Not Found` - Unknown username
/// - `500 Internal Server Error` - Database or signing error
#[tracing::instrument(skip(state, request))]
async fn login(
    State(state): State<FeatureState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, LoginApiError> {
    tracing::info!("Received a POST request to /api/v1/login");

    let command = request.into_command().map_err(LoginApiError::Validation)?;
    let result = super::commands::login::handle(state.users.clone(), &state.tokens, command).await?;

    Ok((StatusCode::OK, Json(result)).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for the login endpoint
#[derive(Debug)]
enum LoginApiError {
    Validation(Vec<FieldViolation>),
    Login(LoginError),
}

impl From<LoginError> for LoginApiError {
    fn from(err: LoginError) -> Self {
        Self::Login(err)
    }
}

impl IntoResponse for LoginApiError {
    fn into_response(self) -> Response {
        match self {
            LoginApiError::Validation(ref violations) => {
                tracing::warn!("Rejected login request: {}", self);
                let error = ErrorResponse::new("VALIDATION_ERROR", "Validation failed")
                    .details(json!(violations));
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },

            LoginApiError::Login(LoginError::UserNotFound) => {
                tracing::warn!("Rejected login request: {}", self);
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },

            LoginApiError::Login(LoginError::InvalidPassword) => {
                tracing::warn!("Rejected login request: {}", self);
                let error = ErrorResponse::new("BAD_REQUEST", self.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },

            LoginApiError::Login(LoginError::Database(_))
            | LoginApiError::Login(LoginError::Mapping(_))
            | LoginApiError::Login(LoginError::Password(_))
            | LoginApiError::Login(LoginError::Token(_)) => {
                tracing::error!("Unexpected error handling login request: {}", self);
                let error = ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An unexpected error occurred. Please try again later.",
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for LoginApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(violations) => {
                write!(f, "Validation failed with {} violation(s)", violations.len())
            },
            Self::Login(e) => write!(f, "{}", e),
        }
    }
}
