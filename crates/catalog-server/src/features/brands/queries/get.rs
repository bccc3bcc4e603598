//! Get brand query

use std::sync::Arc;

use uuid::Uuid;

use crate::db::mapping::brand_from_record;
use crate::db::{BrandRepository, ExecutorError, RecordError};
use crate::models::Brand;

/// Errors that can occur when fetching a brand
#[derive(Debug, thiserror::Error)]
pub enum GetBrandError {
    #[error("Brand not found.")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),

    #[error("Record mapping error: {0}")]
    Mapping(#[from] RecordError),
}

/// Fetch a single brand by id
#[tracing::instrument(skip(brands), fields(brand_id = %id))]
pub async fn handle(brands: Arc<dyn BrandRepository>, id: Uuid) -> Result<Brand, GetBrandError> {
    let record = brands.get_by_id(id).await?.ok_or(GetBrandError::NotFound)?;

    Ok(brand_from_record(&record)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::features::shared::test_helpers::InMemoryCatalog;

    use super::*;

    #[tokio::test]
    async fn test_handle_returns_the_brand() {
        let id = Uuid::new_v4();
        let catalog = InMemoryCatalog::new().with_brand(id, "Acme").into_shared();

        let brand = handle(catalog, id).await.unwrap();

        assert_eq!(brand.id, id);
        assert_eq!(brand.name, "Acme");
    }

    #[tokio::test]
    async fn test_handle_unknown_id_is_not_found() {
        let catalog = InMemoryCatalog::new().into_shared();

        let result = handle(catalog, Uuid::new_v4()).await;

        assert!(matches!(result, Err(GetBrandError::NotFound)));
    }

    #[tokio::test]
    async fn test_handle_surfaces_database_errors() {
        let catalog = InMemoryCatalog::new().with_database_down().into_shared();

        let result = handle(catalog, Uuid::new_v4()).await;

        assert!(matches!(result, Err(GetBrandError::Database(_))));
    }
}
