pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateBrandCommand, CreateBrandError};
pub use delete::{DeleteBrandCommand, DeleteBrandError};
pub use update::{UpdateBrandCommand, UpdateBrandError};
