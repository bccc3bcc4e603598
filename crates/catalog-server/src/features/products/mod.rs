pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{
    CreateProductCommand, CreateProductError, DeleteProductCommand, DeleteProductError,
    UpdateProductCommand, UpdateProductError,
};

pub use queries::{GetProductError, ListProductsError};

pub use routes::product_routes;
