pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateBrandCommand, CreateBrandError, DeleteBrandCommand, DeleteBrandError,
    UpdateBrandCommand, UpdateBrandError,
};

pub use queries::{GetBrandError, ListBrandsError};

pub use routes::brand_routes;
