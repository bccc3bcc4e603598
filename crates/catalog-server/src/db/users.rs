//! User repository

use async_trait::async_trait;

use super::executor::{ExecutorError, ProcCall, QueryExecutor};
use super::record::Record;

/// Data access for user rows
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// One user by username, via `usp_get_user_by_username`; `None` when no
    /// such user exists
    async fn get_by_username(&self, username: &str) -> Result<Option<Record>, ExecutorError>;
}

/// Postgres-backed implementation of [`UserRepository`]
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    executor: QueryExecutor,
}

impl PgUserRepository {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_by_username(&self, username: &str) -> Result<Option<Record>, ExecutorError> {
        self.executor
            .run_single_row_query(
                ProcCall::new("usp_get_user_by_username").text("p_username", username),
            )
            .await
    }
}
