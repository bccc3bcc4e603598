//! Create product command
//!
//! A product always belongs to a brand, so the brand is resolved before
//! anything is written. An unknown brand id fails the command outright and
//! the product procedure is never called. The resolved brand also supplies
//! the denormalized `brand_name` echoed in the response.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::mapping::brand_from_record;
use crate::db::{BrandRepository, ExecutorError, ProductRepository, RecordError};
use crate::models::Product;

/// Command to create a new product under an existing brand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductCommand {
    pub name: String,
    pub description: String,
    pub brand_id: Uuid,
}

/// Errors that can occur when creating a product
#[derive(Debug, thiserror::Error)]
pub enum CreateProductError {
    #[error("Brand not found.")]
    BrandNotFound,

    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),

    #[error("Record mapping error: {0}")]
    Mapping(#[from] RecordError),
}

/// Handler function for creating products
///
/// # Errors
///
/// - [`CreateProductError::BrandNotFound`] if `brand_id` does not exist;
///   no write is attempted in that case
/// - Database errors from either stored procedure call
#[tracing::instrument(
    skip(products, brands, command),
    fields(name = %command.name, brand_id = %command.brand_id)
)]
pub async fn handle(
    products: Arc<dyn ProductRepository>,
    brands: Arc<dyn BrandRepository>,
    command: CreateProductCommand,
) -> Result<Product, CreateProductError> {
    let brand = brands
        .get_by_id(command.brand_id)
        .await?
        .ok_or(CreateProductError::BrandNotFound)?;
    let brand = brand_from_record(&brand)?;

    let product = Product {
        id: Uuid::new_v4(),
        name: command.name,
        description: command.description,
        brand_id: brand.id,
        brand_name: brand.name,
    };

    products
        .create(product.id, &product.name, &product.description, product.brand_id)
        .await?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok(product)
}
