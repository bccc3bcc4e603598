//! List products query

use std::sync::Arc;

use crate::db::mapping::products_from_records;
use crate::db::{ExecutorError, ProductRepository, RecordError};
use crate::models::Product;

/// Errors that can occur when listing products
#[derive(Debug, thiserror::Error)]
pub enum ListProductsError {
    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),

    #[error("Record mapping error: {0}")]
    Mapping(#[from] RecordError),
}

/// Fetch every product in the catalog
#[tracing::instrument(skip(products))]
pub async fn handle(
    products: Arc<dyn ProductRepository>,
) -> Result<Vec<Product>, ListProductsError> {
    let records = products.list().await?;

    Ok(products_from_records(&records)?)
}
