//! Login command
//!
//! Resolves the user by username, checks the password against the stored
//! bcrypt hash, and signs a bearer token on success. Unknown usernames and
//! wrong passwords surface as distinct errors; clients tell them apart.

use std::sync::Arc;

use serde::Deserialize;

use crate::auth::{verify_password, PasswordError, TokenError, TokenService};
use crate::db::mapping::credential_from_record;
use crate::db::{ExecutorError, RecordError, UserRepository};
use crate::models::LoginResult;

/// Command carrying the submitted credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Errors that can occur during login
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("User not found.")]
    UserNotFound,

    #[error("Invalid password.")]
    InvalidPassword,

    #[error("Database error: {0}")]
    Database(#[from] ExecutorError),

    #[error("Record mapping error: {0}")]
    Mapping(#[from] RecordError),

    #[error("Password verification error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

/// Handler function for login
///
/// # Errors
///
/// - [`LoginError::UserNotFound`] when the username is unknown
/// - [`LoginError::InvalidPassword`] when the password does not match
/// - Database, mapping, hash, or signing failures otherwise
#[tracing::instrument(skip(users, tokens, command), fields(username = %command.username))]
pub async fn handle(
    users: Arc<dyn UserRepository>,
    tokens: &TokenService,
    command: LoginCommand,
) -> Result<LoginResult, LoginError> {
    let record = users
        .get_by_username(&command.username)
        .await?
        .ok_or(LoginError::UserNotFound)?;
    let credential = credential_from_record(&record)?;

    if !verify_password(&command.password, &credential.password_hash)? {
        tracing::info!("Login rejected: wrong password");
        return Err(LoginError::InvalidPassword);
    }

    let access_token = tokens.issue(&command.username)?;

    tracing::info!("Login succeeded");

    Ok(LoginResult {
        user: credential.profile,
        access_token,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use crate::features::shared::test_helpers::{test_token_service, InMemoryCatalog};

    use super::*;

    fn command(username: &str, password: &str) -> LoginCommand {
        LoginCommand {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_handle_issues_a_token_for_valid_credentials() {
        let catalog = InMemoryCatalog::new()
            .with_user("ada", "Ada", "Lovelace", "s3cret")
            .into_shared();
        let tokens = test_token_service();

        let result = handle(catalog, &tokens, command("ada", "s3cret"))
            .await
            .unwrap();

        assert_eq!(result.user.first_name, "Ada");
        assert_eq!(result.user.last_name, "Lovelace");

        let claims = tokens.verify(&result.access_token).unwrap();
        assert_eq!(claims.sub, "ada");
    }

    #[tokio::test]
    async fn test_handle_unknown_username() {
        let catalog = InMemoryCatalog::new().into_shared();
        let tokens = test_token_service();

        let result = handle(catalog, &tokens, command("nobody", "s3cret")).await;

        assert!(matches!(result, Err(LoginError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_handle_wrong_password() {
        let catalog = InMemoryCatalog::new()
            .with_user("ada", "Ada", "Lovelace", "s3cret")
            .into_shared();
        let tokens = test_token_service();

        let result = handle(catalog, &tokens, command("ada", "wrong")).await;

        assert!(matches!(result, Err(LoginError::InvalidPassword)));
    }

    #[tokio::test]
    async fn test_handle_surfaces_database_errors() {
        let catalog = InMemoryCatalog::new().with_database_down().into_shared();
        let tokens = test_token_service();

        let result = handle(catalog, &tokens, command("ada", "s3cret")).await;

        assert!(matches!(result, Err(LoginError::Database(_))));
    }
}
