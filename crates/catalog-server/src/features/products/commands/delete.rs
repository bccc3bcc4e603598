//! Delete product command

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{ExecutorError, ProductRepository};

/// Command to delete a product by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteProductCommand {
    pub id: Uuid,
}

/// Errors that can occur when deleting a product
#[derive(Debug, thiserror::Error)]
pub enum DeleteProductError {
    #[error("Product not found.")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),
}

/// Handler function for deleting products.
///
/// Existence is checked before the write, mirroring the update path.
#[tracing::instrument(skip(products, command), fields(product_id = %command.id))]
pub async fn handle(
    products: Arc<dyn ProductRepository>,
    command: DeleteProductCommand,
) -> Result<(), DeleteProductError> {
    if products.get_by_id(command.id).await?.is_none() {
        return Err(DeleteProductError::NotFound);
    }

    products.delete(command.id).await?;

    tracing::info!("Product deleted");

    Ok(())
}
