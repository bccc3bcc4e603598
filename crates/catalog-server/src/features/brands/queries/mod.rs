pub mod get;
pub mod list;

pub use get::GetBrandError;
pub use list::ListBrandsError;
