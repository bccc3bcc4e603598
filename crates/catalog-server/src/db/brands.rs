//! Brand repository

use async_trait::async_trait;
use uuid::Uuid;

use super::executor::{ExecutorError, ProcCall, QueryExecutor};
use super::record::Record;

/// Data access for brand rows
///
/// Each method is bound to exactly one stored procedure. Results come back
/// as raw records; mapping to domain models is the service layer's job.
#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// All brands, via `usp_get_brands`
    async fn list(&self) -> Result<Vec<Record>, ExecutorError>;

    /// One brand by id, via `usp_get_brand_by_id`; `None` when absent
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, ExecutorError>;

    /// Insert via `usp_create_brand`, returning the affected-row count
    async fn create(&self, id: Uuid, name: &str) -> Result<u64, ExecutorError>;

    /// Update via `usp_update_brand`, returning the affected-row count
    async fn update(&self, id: Uuid, name: &str) -> Result<u64, ExecutorError>;

    /// Delete via `usp_delete_brand`, returning the affected-row count
    async fn delete(&self, id: Uuid) -> Result<u64, ExecutorError>;
}

/// Postgres-backed implementation of [`BrandRepository`]
#[derive(Debug, Clone)]
pub struct PgBrandRepository {
    executor: QueryExecutor,
}

impl PgBrandRepository {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl BrandRepository for PgBrandRepository {
    async fn list(&self) -> Result<Vec<Record>, ExecutorError> {
        self.executor.run_query(ProcCall::new("usp_get_brands")).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, ExecutorError> {
        self.executor
            .run_single_row_query(ProcCall::new("usp_get_brand_by_id").uuid("p_id_brand", id))
            .await
    }

    async fn create(&self, id: Uuid, name: &str) -> Result<u64, ExecutorError> {
        self.executor
            .run_non_query(
                ProcCall::new("usp_create_brand")
                    .uuid("p_id_brand", id)
                    .text("p_name", name),
            )
            .await
    }

    async fn update(&self, id: Uuid, name: &str) -> Result<u64, ExecutorError> {
        self.executor
            .run_non_query(
                ProcCall::new("usp_update_brand")
                    .uuid("p_id_brand", id)
                    .text("p_name", name),
            )
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ExecutorError> {
        self.executor
            .run_non_query(ProcCall::new("usp_delete_brand").uuid("p_id_brand", id))
            .await
    }
}
