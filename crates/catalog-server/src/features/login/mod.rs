pub mod commands;
pub mod routes;

pub use commands::{LoginCommand, LoginError};

pub use routes::login_routes;
