//! Shared HTTP surface types.

pub mod response;

pub use response::{ErrorDetail, ErrorResponse};
