//! Domain models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Brand model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
}

/// Product model
///
/// Carries the owning brand's name, denormalized at read time by the
/// product procedures' join against the brands table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub brand_id: Uuid,
    pub brand_name: String,
}

/// Public portion of a user account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub first_name: String,
    pub last_name: String,
}

/// Stored credential row for a user
///
/// Deliberately not serializable; the password hash must never leave the
/// process. The profile half is what login responses are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub profile: UserProfile,
    pub password_hash: String,
}

/// Successful login payload: the user's profile plus a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    #[serde(flatten)]
    pub user: UserProfile,
    pub access_token: String,
}
