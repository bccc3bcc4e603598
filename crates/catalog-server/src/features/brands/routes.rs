//! Brand API routes
//!
//! Wires the brand commands and queries to Axum HTTP handlers.
//!
//! # Route Structure
//!
//! - `GET /api/v1/brands` - List all brands
//! - `GET /api/v1/brands/:id` - Get a brand by id
//! - `POST /api/v1/brands` - Create a new brand
//! - `PUT /api/v1/brands/:id` - Rename a brand
//! - `DELETE /api/v1/brands/:id` - Delete a brand
//!
//! All brand routes are mounted behind the bearer guard and the per-token
//! admission buckets; see [`crate::features::router`].

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::api::response::ErrorResponse;
use crate::features::shared::validation::{validate_text, FieldViolation, MAX_NAME_LENGTH};
use crate::features::FeatureState;

use super::commands::{
    CreateBrandCommand, CreateBrandError, DeleteBrandCommand, DeleteBrandError,
    UpdateBrandCommand, UpdateBrandError,
};
use super::queries::{GetBrandError, ListBrandsError};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the brands router with all routes configured
pub fn brand_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_brands))
        .route("/", post(create_brand))
        .route("/:id", get(get_brand))
        .route("/:id", put(update_brand))
        .route("/:id", delete(delete_brand))
}

// ============================================================================
// Request Bodies
// ============================================================================

/// Request body shared by create and update; both only carry a name
#[derive(Debug, Deserialize)]
struct BrandRequest {
    name: Option<String>,
}

impl BrandRequest {
    /// Validate the payload and surrender the name
    fn validated_name(self) -> Result<String, Vec<FieldViolation>> {
        let name = self.name.unwrap_or_default();
        match validate_text("brand name", &name, MAX_NAME_LENGTH) {
            Ok(()) => Ok(name),
            Err(error) => Err(vec![FieldViolation::new("name", error)]),
        }
    }
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List all brands
///
/// # Endpoint
///
/// `GET /api/v1/brands`
///
/// # Response
///
/// - `200 OK` - Array of brands, possibly empty
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state))]
async fn list_brands(State(state): State<FeatureState>) -> Result<Response, BrandApiError> {
    tracing::info!("Received a GET request to /api/v1/brands");

    let brands = super::queries::list::handle(state.brands.clone()).await?;

    tracing::debug!(count = brands.len(), "Brands listed via API");

    Ok((StatusCode::OK, Json(brands)).into_response())
}

/// Get a single brand by id
///
/// # Endpoint
///
/// `GET /api/v1/brands/:id`
///
/// # Response
///
/// - `200 OK` - Brand found
/// - `404 Not Found` - Unknown brand id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state), fields(brand_id = %id))]
async fn get_brand(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, BrandApiError> {
    tracing::info!("Received a GET request to /api/v1/brands/{id}");

    let brand = super::queries::get::handle(state.brands.clone(), id).await?;

    Ok((StatusCode::OK, Json(brand)).into_response())
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a new brand
///
/// # Endpoint
///
/// `POST /api/v1/brands`
///
/// # Request Body
///
/// ```json
/// { "name": "Acme" }
/// ```
///
/// # Response
///
/// - `201 Created` - Brand created; `Location` points at the new resource
/// - `400 Bad Request` - Validation error with per-field details
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state, request))]
async fn create_brand(
    State(state): State<FeatureState>,
    Json(request): Json<BrandRequest>,
) -> Result<Response, BrandApiError> {
    tracing::info!("Received a POST request to /api/v1/brands");

    let name = request.validated_name().map_err(BrandApiError::Validation)?;
    let brand = super::commands::create::handle(state.brands.clone(), CreateBrandCommand { name })
        .await?;

    tracing::info!(brand_id = %brand.id, "Brand created via API");

    let location = format!("/api/v1/brands/{}", brand.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(brand),
    )
        .into_response())
}

/// Rename an existing brand
///
/// # Endpoint
///
/// `PUT /api/v1/brands/:id`
///
/// # Response
///
/// - `204 No Content` - Brand updated
/// - `400 Bad Request` - Validation error with per-field details
/// - `404 Not Found` - Unknown brand id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state, request), fields(brand_id = %id))]
async fn update_brand(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
    Json(request): Json<BrandRequest>,
) -> Result<Response, BrandApiError> {
    tracing::info!("Received a PUT request to /api/v1/brands/{id}");

    let name = request.validated_name().map_err(BrandApiError::Validation)?;
    super::commands::update::handle(state.brands.clone(), UpdateBrandCommand { id, name }).await?;

    tracing::info!("Brand updated via API");

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete a brand
///
/// # Endpoint
///
/// `DELETE /api/v1/brands/:id`
///
/// # Response
///
/// - `204 No Content` - Brand deleted
/// - `404 Not Found` - Unknown brand id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state), fields(brand_id = %id))]
async fn delete_brand(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, BrandApiError> {
    tracing::info!("Received a DELETE request to /api/v1/brands/{id}");

    super::commands::delete::handle(state.brands.clone(), DeleteBrandCommand { id }).await?;

    tracing::info!("Brand deleted via API");

    Ok(StatusCode::NO_CONTENT.into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for brand API endpoints
#[derive(Debug)]
enum BrandApiError {
    Validation(Vec<FieldViolation>),
    Create(CreateBrandError),
    Update(UpdateBrandError),
    Delete(DeleteBrandError),
    Get(GetBrandError),
    List(ListBrandsError),
}

impl From<CreateBrandError> for BrandApiError {
    fn from(err: CreateBrandError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateBrandError> for BrandApiError {
    fn from(err: UpdateBrandError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteBrandError> for BrandApiError {
    fn from(err: DeleteBrandError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetBrandError> for BrandApiError {
    fn from(err: GetBrandError) -> Self {
        Self::Get(err)
    }
}

impl From<ListBrandsError> for BrandApiError {
    fn from(err: ListBrandsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for BrandApiError {
    fn into_response(self) -> Response {
        match self {
            BrandApiError::Validation(ref violations) => {
                tracing::warn!("Rejected brand request: {}", self);
                let error = ErrorResponse::new("VALIDATION_ERROR", "Validation failed")
                    .details(json!(violations));
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },

            BrandApiError::Update(UpdateBrandError::NotFound)
            | BrandApiError::Delete(DeleteBrandError::NotFound)
            | BrandApiError::Get(GetBrandError::NotFound) => {
                tracing::warn!("Rejected brand request: {}", self);
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },

            BrandApiError::Create(CreateBrandError::Database(_))
            | BrandApiError::Update(UpdateBrandError::Database(_))
            | BrandApiError::Delete(DeleteBrandError::Database(_))
            | BrandApiError::Get(GetBrandError::Database(_))
            | BrandApiError::Get(GetBrandError::Mapping(_))
            | BrandApiError::List(ListBrandsError::Database(_))
            | BrandApiError::List(ListBrandsError::Mapping(_)) => {
                tracing::error!("Unexpected error handling brand request: {}", self);
                let error = ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An unexpected error occurred. Please try again later.",
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for BrandApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(violations) => {
                write!(f, "Validation failed with {} violation(s)", violations.len())
            },
            Self::Create(e) => write!(f, "{}", e),
            Self::Update(e) => write!(f, "{}", e),
            Self::Delete(e) => write!(f, "{}", e),
            Self::Get(e) => write!(f, "{}", e),
            Self::List(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_name_is_a_required_violation() {
        let request = BrandRequest { name: None };

        let violations = request.validated_name().unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].message, "The brand name is required.");
    }

    #[test]
    fn test_too_long_name_is_rejected_with_the_limit() {
        let request = BrandRequest {
            name: Some("a".repeat(MAX_NAME_LENGTH + 1)),
        };

        let violations = request.validated_name().unwrap_err();

        assert_eq!(
            violations[0].message,
            "The brand name cannot exceed 100 characters."
        );
    }

    #[test]
    fn test_bad_characters_are_rejected() {
        let request = BrandRequest {
            name: Some("Acme!".to_string()),
        };

        let violations = request.validated_name().unwrap_err();

        assert_eq!(
            violations[0].message,
            "The brand name can only contain letters, numbers, spaces, and hyphens."
        );
    }

    #[test]
    fn test_valid_name_builds_the_command() {
        let request = BrandRequest {
            name: Some("Acme Corp".to_string()),
        };

        assert_eq!(request.validated_name().unwrap(), "Acme Corp");
    }

    #[test]
    fn test_error_display() {
        let err = BrandApiError::Get(GetBrandError::NotFound);
        assert_eq!(err.to_string(), "Brand not found.");
    }

    #[test]
    fn test_routes_structure() {
        let router = brand_routes();
        assert!(format!("{:?}", router).contains("Router"));
    }
}
