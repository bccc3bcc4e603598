//! Create brand command
//!
//! The server owns identifier generation: a fresh UUID is minted here and
//! sent to the stored procedure, so the response can echo the full brand
//! without a second round trip.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{BrandRepository, ExecutorError};
use crate::models::Brand;

/// Command to create a new brand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBrandCommand {
    /// Display name of the brand
    pub name: String,
}

/// Errors that can occur when creating a brand
#[derive(Debug, thiserror::Error)]
pub enum CreateBrandError {
    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),
}

/// Handler function for creating brands
///
/// # Errors
///
/// Returns a database error if the stored procedure call fails.
#[tracing::instrument(skip(brands, command), fields(name = %command.name))]
pub async fn handle(
    brands: Arc<dyn BrandRepository>,
    command: CreateBrandCommand,
) -> Result<Brand, CreateBrandError> {
    let brand = Brand {
        id: Uuid::new_v4(),
        name: command.name,
    };

    brands.create(brand.id, &brand.name).await?;

    tracing::info!(brand_id = %brand.id, "Brand created");

    Ok(brand)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::features::shared::test_helpers::InMemoryCatalog;

    use super::*;

    #[tokio::test]
    async fn test_handle_creates_brand() {
        let catalog = InMemoryCatalog::new().into_shared();
        let command = CreateBrandCommand {
            name: "Acme".to_string(),
        };

        let brand = handle(catalog.clone(), command).await.unwrap();

        assert_eq!(brand.name, "Acme");
        assert_eq!(catalog.brand_mutations.creates(), 1);

        let stored = BrandRepository::get_by_id(catalog.as_ref(), brand.id)
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_handle_mints_distinct_ids() {
        let catalog = InMemoryCatalog::new().into_shared();

        let first = handle(
            catalog.clone(),
            CreateBrandCommand {
                name: "Acme".to_string(),
            },
        )
        .await
        .unwrap();
        let second = handle(
            catalog.clone(),
            CreateBrandCommand {
                name: "Acme".to_string(),
            },
        )
        .await
        .unwrap();

        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_handle_surfaces_database_errors() {
        let catalog = InMemoryCatalog::new().with_database_down().into_shared();
        let command = CreateBrandCommand {
            name: "Acme".to_string(),
        };

        let result = handle(catalog, command).await;

        assert!(matches!(result, Err(CreateBrandError::Database(_))));
    }
}
