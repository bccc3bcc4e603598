//! Product API routes
//!
//! Wires the product commands and queries to Axum HTTP handlers.
//!
//! # Route Structure
//!
//! - `GET /api/v1/products` - List all products
//! - `GET /api/v1/products/:id` - Get a product by id
//! - `POST /api/v1/products` - Create a new product
//! - `PUT /api/v1/products/:id` - Update a product
//! - `DELETE /api/v1/products/:id` - Delete a product
//!
//! All product routes are mounted behind the bearer guard and the per-token
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
use crate::features::shared::validation::{
    validate_text, FieldViolation, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH,
};
use crate::features::FeatureState;

use super::commands::{
    CreateProductCommand, CreateProductError, DeleteProductCommand, DeleteProductError,
    UpdateProductCommand, UpdateProductError,
};
use super::queries::{GetProductError, ListProductsError};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the products router with all routes configured
pub fn product_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_products))
        .route("/", post(create_product))
        .route("/:id", get(get_product))
        .route("/:id", put(update_product))
        .route("/:id", delete(delete_product))
}

// ============================================================================
// Request Bodies
// ============================================================================

/// Request body shared by create and update
#[derive(Debug, Deserialize)]
struct ProductRequest {
    name: Option<String>,
    description: Option<String>,
    brand_id: Option<Uuid>,
}

impl ProductRequest {
    /// Validate the payload, collecting every violation before giving up
    fn validated(self) -> Result<(String, String, Uuid), Vec<FieldViolation>> {
        let name = self.name.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        let mut violations = Vec::new();

        if let Err(error) = validate_text("product name", &name, MAX_NAME_LENGTH) {
            violations.push(FieldViolation::new("name", error));
        }
        if let Err(error) =
            validate_text("product description", &description, MAX_DESCRIPTION_LENGTH)
        {
            violations.push(FieldViolation::new("description", error));
        }
        if self.brand_id.is_none() {
            violations.push(FieldViolation::new("brand_id", "The brand ID is required."));
        }

        match self.brand_id {
            Some(brand_id) if violations.is_empty() => Ok((name, description, brand_id)),
            _ => Err(violations),
        }
    }
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

/// List all products
///
/// # Endpoint
///
/// `GET /api/v1/products`
///
/// # Response
///
/// - `200 OK` - Array of products, each carrying its brand name
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state))]
async fn list_products(State(state): State<FeatureState>) -> Result<Response, ProductApiError> {
    tracing::info!("Received a GET request to /api/v1/products");

    let products = super::queries::list::handle(state.products.clone()).await?;

    tracing::debug!(count = products.len(), "Products listed via API");

    Ok((StatusCode::OK, Json(products)).into_response())
}

/// Get a single product by id
///
/// # Endpoint
///
/// `GET /api/v1/products/:id`
///
/// # Response
///
/// - `200 OK` - Product found
/// - `404 Not Found` - Unknown product id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state), fields(product_id = %id))]
async fn get_product(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ProductApiError> {
    tracing::info!("Received a GET request to /api/v1/products/{id}");

    let product = super::queries::get::handle(state.products.clone(), id).await?;

    Ok((StatusCode::OK, Json(product)).into_response())
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Create a new product
///
/// # Endpoint
///
/// `POST /api/v1/products`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Widget",
///   "description": "A fine widget",
///   "brand_id": "7a4ae0a6-7c3e-4d6e-8f39-5718b1b12a47"
/// }
/// ```
///
/// # Response
///
/// - `201 Created` - Product created; `Location` points at the new resource
/// - `400 Bad Request` - Validation error with per-field details
/// - `404 Not Found` - Referenced brand does not exist
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state, request))]
async fn create_product(
    State(state): State<FeatureState>,
    Json(request): Json<ProductRequest>,
) -> Result<Response, ProductApiError> {
    tracing::info!("Received a POST request to /api/v1/products");

    let (name, description, brand_id) =
        request.validated().map_err(ProductApiError::Validation)?;
    let command = CreateProductCommand {
        name,
        description,
        brand_id,
    };
    let product =
        super::commands::create::handle(state.products.clone(), state.brands.clone(), command)
            .await?;

    tracing::info!(product_id = %product.id, "Product created via API");

    let location = format!("/api/v1/products/{}", product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    )
        .into_response())
}

/// Update an existing product
///
/// # Endpoint
///
/// `PUT /api/v1/products/:id`
///
/// # Response
///
/// - `204 No Content` - Product updated
/// - `400 Bad Request` - Validation error with per-field details
/// - `404 Not Found` - Unknown product id or target brand
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state, request), fields(product_id = %id))]
async fn update_product(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ProductRequest>,
) -> Result<Response, ProductApiError> {
    tracing::info!("Received a PUT request to /api/v1/products/{id}");

    let (name, description, brand_id) =
        request.validated().map_err(ProductApiError::Validation)?;
    let command = UpdateProductCommand {
        id,
        name,
        description,
        brand_id,
    };
    super::commands::update::handle(state.products.clone(), state.brands.clone(), command).await?;

    tracing::info!("Product updated via API");

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Delete a product
///
/// # Endpoint
///
/// `DELETE /api/v1/products/:id`
///
/// # Response
///
/// - `204 No Content` - Product deleted
/// - `404 Not Found` - Unknown product id
/// - `500 Internal Server Error` - Database error
#[tracing::instrument(skip(state), fields(product_id = %id))]
async fn delete_product(
    State(state): State<FeatureState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ProductApiError> {
    tracing::info!("Received a DELETE request to /api/v1/products/{id}");

    super::commands::delete::handle(state.products.clone(), DeleteProductCommand { id }).await?;

    tracing::info!("Product deleted via API");

    Ok(StatusCode::NO_CONTENT.into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for product API endpoints
#[derive(Debug)]
enum ProductApiError {
    Validation(Vec<FieldViolation>),
    Create(CreateProductError),
    Update(UpdateProductError),
    Delete(DeleteProductError),
    Get(GetProductError),
    List(ListProductsError),
}

impl From<CreateProductError> for ProductApiError {
    fn from(err: CreateProductError) -> Self {
        Self::Create(err)
    }
}

impl From<UpdateProductError> for ProductApiError {
    fn from(err: UpdateProductError) -> Self {
        Self::Update(err)
    }
}

impl From<DeleteProductError> for ProductApiError {
    fn from(err: DeleteProductError) -> Self {
        Self::Delete(err)
    }
}

impl From<GetProductError> for ProductApiError {
    fn from(err: GetProductError) -> Self {
        Self::Get(err)
    }
}

impl From<ListProductsError> for ProductApiError {
    fn from(err: ListProductsError) -> Self {
        Self::List(err)
    }
}

impl IntoResponse for ProductApiError {
    fn into_response(self) -> Response {
        match self {
            ProductApiError::Validation(ref violations) => {
                tracing::warn!("Rejected product request: {}", self);
                let error = ErrorResponse::new("VALIDATION_ERROR", "Validation failed")
                    .details(json!(violations));
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },

            ProductApiError::Create(CreateProductError::BrandNotFound)
            | ProductApiError::Update(UpdateProductError::ProductNotFound)
            | ProductApiError::Update(UpdateProductError::BrandNotFound)
            | ProductApiError::Delete(DeleteProductError::NotFound)
            | ProductApiError::Get(GetProductError::NotFound) => {
                tracing::warn!("Rejected product request: {}", self);
                let error = ErrorResponse::new("NOT_FOUND", self.to_string());
                (StatusCode::NOT_FOUND, Json(error)).into_response()
            },

            ProductApiError::Create(CreateProductError::Database(_))
            | ProductApiError::Create(CreateProductError::Mapping(_))
            | ProductApiError::Update(UpdateProductError::Database(_))
            | ProductApiError::Delete(DeleteProductError::Database(_))
            | ProductApiError::Get(GetProductError::Database(_))
            | ProductApiError::Get(GetProductError::Mapping(_))
            | ProductApiError::List(ListProductsError::Database(_))
            | ProductApiError::List(ListProductsError::Mapping(_)) => {
                tracing::error!("Unexpected error handling product request: {}", self);
                let error = ErrorResponse::new(
                    "INTERNAL_ERROR",
                    "An unexpected error occurred. Please try again later.",
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}

impl std::fmt::Display for ProductApiError {
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
    fn test_empty_request_collects_every_violation() {
        let request = ProductRequest {
            name: None,
            description: None,
            brand_id: None,
        };

        let violations = request.validated().unwrap_err();

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].field, "name");
        assert_eq!(violations[0].message, "The product name is required.");
        assert_eq!(violations[1].field, "description");
        assert_eq!(violations[1].message, "The product description is required.");
        assert_eq!(violations[2].field, "brand_id");
        assert_eq!(violations[2].message, "The brand ID is required.");
    }

    #[test]
    fn test_long_description_is_rejected_with_the_limit() {
        let request = ProductRequest {
            name: Some("Widget".to_string()),
            description: Some("a".repeat(MAX_DESCRIPTION_LENGTH + 1)),
            brand_id: Some(Uuid::new_v4()),
        };

        let violations = request.validated().unwrap_err();

        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "The product description cannot exceed 100 characters."
        );
    }

    #[test]
    fn test_valid_request_yields_all_parts() {
        let brand_id = Uuid::new_v4();
        let request = ProductRequest {
            name: Some("Widget".to_string()),
            description: Some("A fine widget".to_string()),
            brand_id: Some(brand_id),
        };

        let (name, description, parsed) = request.validated().unwrap();

        assert_eq!(name, "Widget");
        assert_eq!(description, "A fine widget");
        assert_eq!(parsed, brand_id);
    }

    #[test]
    fn test_error_display() {
        let err = ProductApiError::Update(UpdateProductError::ProductNotFound);
        assert_eq!(err.to_string(), "Product not found.");
    }

    #[test]
    fn test_routes_structure() {
        let router = product_routes();
        assert!(format!("{:?}", router).contains("Router"));
    }
}
