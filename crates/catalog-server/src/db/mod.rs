//! Data access layer
//!
//! Organized around stored procedures: the [`executor`] renders and runs
//! them, [`record`] holds detached result rows, the per-entity repository
//! modules bind procedures to traits the service layer consumes, and
//! [`mapping`] turns records into domain models.

pub mod brands;
pub mod executor;
pub mod mapping;
pub mod products;
pub mod record;
pub mod users;

pub use brands::{BrandRepository, PgBrandRepository};
pub use executor::{ExecutorError, ProcCall, QueryExecutor};
pub use products::{PgProductRepository, ProductRepository};
pub use record::{Field, Record, RecordError};
pub use users::{PgUserRepository, UserRepository};
