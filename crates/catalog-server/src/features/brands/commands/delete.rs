//! Delete brand command

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{BrandRepository, ExecutorError};

/// Command to delete a brand by id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBrandCommand {
    pub id: Uuid,
}

/// Errors that can occur when deleting a brand
#[derive(Debug, thiserror::Error)]
pub enum DeleteBrandError {
    #[error("Brand not found.")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),
}

/// Handler function for deleting brands.
///
/// Existence is checked before the write, mirroring the update path.
#[tracing::instrument(skip(brands, command), fields(brand_id = %command.id))]
pub async fn handle(
    brands: Arc<dyn BrandRepository>,
    command: DeleteBrandCommand,
) -> Result<(), DeleteBrandError> {
    if brands.get_by_id(command.id).await?.is_none() {
        return Err(DeleteBrandError::NotFound);
    }

    brands.delete(command.id).await?;

    tracing::info!("Brand deleted");

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::features::shared::test_helpers::InMemoryCatalog;

    use super::*;

    #[tokio::test]
    async fn test_handle_deletes_existing_brand() {
        let id = Uuid::new_v4();
        let catalog = InMemoryCatalog::new().with_brand(id, "Acme").into_shared();

        handle(catalog.clone(), DeleteBrandCommand { id }).await.unwrap();

        let record = BrandRepository::get_by_id(catalog.as_ref(), id)
            .await
            .unwrap();
        assert!(record.is_none());
        assert_eq!(catalog.brand_mutations.deletes(), 1);
    }

    #[tokio::test]
    async fn test_handle_unknown_brand_attempts_no_write() {
        let catalog = InMemoryCatalog::new().into_shared();

        let result = handle(catalog.clone(), DeleteBrandCommand { id: Uuid::new_v4() }).await;

        assert!(matches!(result, Err(DeleteBrandError::NotFound)));
        assert_eq!(catalog.brand_mutations.deletes(), 0);
    }
}
