//! Update brand command

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{BrandRepository, ExecutorError};

/// Command to rename an existing brand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBrandCommand {
    pub id: Uuid,
    pub name: String,
}

/// Errors that can occur when updating a brand
#[derive(Debug, thiserror::Error)]
pub enum UpdateBrandError {
    #[error("Brand not found.")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),
}

/// Handler function for updating brands.
///
/// Existence is checked before the write; an unknown id returns
/// [`UpdateBrandError::NotFound`] without attempting the update.
#[tracing::instrument(skip(brands, command), fields(brand_id = %command.id))]
pub async fn handle(
    brands: Arc<dyn BrandRepository>,
    command: UpdateBrandCommand,
) -> Result<(), UpdateBrandError> {
    if brands.get_by_id(command.id).await?.is_none() {
        return Err(UpdateBrandError::NotFound);
    }

    brands.update(command.id, &command.name).await?;

    tracing::info!("Brand updated");

    Ok(())
}
