//! Update product command
//!
//! Both referenced rows are checked before the write: first the product
//! being updated, then the brand it is being moved to. Either miss fails
//! the command without touching the product table.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{BrandRepository, ExecutorError, ProductRepository};

/// Command to update an existing product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProductCommand {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub brand_id: Uuid,
}

/// Errors that can occur when updating a product
#[derive(Debug, thiserror::Error)]
pub enum UpdateProductError {
    #[error("Product not found.")]
    ProductNotFound,

    #[error("Brand not found.")]
    BrandNotFound,

    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),
}

/// Handler function for updating products
#[tracing::instrument(
    skip(products, brands, command),
    fields(product_id = %command.id, brand_id = %command.brand_id)
)]
pub async fn handle(
    products: Arc<dyn ProductRepository>,
    brands: Arc<dyn BrandRepository>,
    command: UpdateProductCommand,
) -> Result<(), UpdateProductError> {
    if products.get_by_id(command.id).await?.is_none() {
        return Err(UpdateProductError::ProductNotFound);
    }

    if brands.get_by_id(command.brand_id).await?.is_none() {
        return Err(UpdateProductError::BrandNotFound);
    }

    products
        .update(command.id, &command.name, &command.description, command.brand_id)
        .await?;

    tracing::info!("Product updated");

    Ok(())
}
