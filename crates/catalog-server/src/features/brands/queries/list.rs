//! List brands query

use std::sync::Arc;

use crate::db::mapping::brands_from_records;
use crate::db::{BrandRepository, ExecutorError, RecordError};
use crate::models::Brand;

/// Errors that can occur when listing brands
#[derive(Debug, thiserror::Error)]
pub enum ListBrandsError {
    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),

    #[error("Record mapping error: {0}")]
    Mapping(#[from] RecordError),
}

/// Fetch every brand in the catalog
#[tracing::instrument(skip(brands))]
pub async fn handle(brands: Arc<dyn BrandRepository>) -> Result<Vec<Brand>, ListBrandsError> {
    let records = brands.list().await?;

    Ok(brands_from_records(&records)?)
}
