//! Authentication: password checks, bearer token lifecycle, route guard.

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::require_bearer;
pub use password::{verify_password, PasswordError};
pub use token::{Claims, TokenError, TokenService};
