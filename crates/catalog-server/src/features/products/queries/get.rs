//! Get product query
//!
//! The stored procedure joins the brands table, so the returned record
//! already carries `brand_name`.

use std::sync::Arc;

use uuid::Uuid;

use crate::db::mapping::product_from_record;
use crate::db::{ExecutorError, ProductRepository, RecordError};
use crate::models::Product;

/// Errors that can occur when fetching a product
#[derive(Debug, thiserror::Error)]
pub enum GetProductError {
    #[error("Product not found.")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),

    #[error("Record mapping error: {0}")]
    Mapping(#[from] RecordError),
}

/// Fetch a single product by id
#[tracing::instrument(skip(products), fields(product_id = %id))]
pub async fn handle(
    products: Arc<dyn ProductRepository>,
    id: Uuid,
) -> Result<Product, GetProductError> {
    let record = products
        .get_by_id(id)
        .await?
        .ok_or(GetProductError::NotFound)?;

    Ok(product_from_record(&record)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::features::shared::test_helpers::InMemoryCatalog;

    use super::*;

    #[tokio::test]
    async fn test_handle_returns_the_product_with_brand_name() {
        let brand_id = Uuid::new_v4();
        let product_id = Uuid::new_v4();
        let catalog = InMemoryCatalog::new()
            .with_brand(brand_id, "Acme")
            .with_product(product_id, "Widget", "A widget", brand_id)
            .into_shared();

        let product = handle(catalog, product_id).await.unwrap();

        assert_eq!(product.id, product_id);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.brand_name, "Acme");
    }

    #[tokio::test]
    async fn test_handle_unknown_id_is_not_found() {
        let catalog = InMemoryCatalog::new().into_shared();

        let result = handle(catalog, Uuid::new_v4()).await;

        assert!(matches!(result, Err(GetProductError::NotFound)));
    }
}
