//! Product repository

use async_trait::async_trait;
use uuid::Uuid;

use super::executor::{ExecutorError, ProcCall, QueryExecutor};
use super::record::Record;

/// Data access for product rows
///
/// Read procedures join the owning brand, so product records carry a
/// `brand_name` column alongside the product's own fields.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products, via `usp_get_products`
    async fn list(&self) -> Result<Vec<Record>, ExecutorError>;

    /// One product by id, via `usp_get_product_by_id`; `None` when absent
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, ExecutorError>;

    /// Insert via `usp_create_product`, returning the affected-row count
    async fn create(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        brand_id: Uuid,
    ) -> Result<u64, ExecutorError>;

    /// Update via `usp_update_product`, returning the affected-row count
    async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        brand_id: Uuid,
    ) -> Result<u64, ExecutorError>;

    /// Delete via `usp_delete_product`, returning the affected-row count
    async fn delete(&self, id: Uuid) -> Result<u64, ExecutorError>;
}

/// Postgres-backed implementation of [`ProductRepository`]
#[derive(Debug, Clone)]
pub struct PgProductRepository {
    executor: QueryExecutor,
}

impl PgProductRepository {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Record>, ExecutorError> {
        self.executor.run_query(ProcCall::new("usp_get_products")).await
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Record>, ExecutorError> {
        self.executor
            .run_single_row_query(ProcCall::new("usp_get_product_by_id").uuid("p_id_product", id))
            .await
    }

    async fn create(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        brand_id: Uuid,
    ) -> Result<u64, ExecutorError> {
        self.executor
            .run_non_query(
                ProcCall::new("usp_create_product")
                    .uuid("p_id_product", id)
                    .text("p_name", name)
                    .text("p_description", description)
                    .uuid("p_id_brand", brand_id),
            )
            .await
    }

    async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        brand_id: Uuid,
    ) -> Result<u64, ExecutorError> {
        self.executor
            .run_non_query(
                ProcCall::new("usp_update_product")
                    .uuid("p_id_product", id)
                    .text("p_name", name)
                    .text("p_description", description)
                    .uuid("p_id_brand", brand_id),
            )
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<u64, ExecutorError> {
        self.executor
            .run_non_query(ProcCall::new("usp_delete_product").uuid("p_id_product", id))
            .await
    }
}
