//! Catalog Server Library
//!
//! HTTP server exposing a product catalog.
//!
//! # Overview
//!
//! The catalog server provides a REST API for brands and products:
//!
//! - **API Endpoints**: CRUD for brands and products, plus login
//! - **Database Management**: PostgreSQL behind stored procedures, via SQLx
//! - **Authentication**: Username/password login issuing short-lived JWTs
//! - **Request Admission**: Per-IP login window, per-token request buckets
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS, request logging, and compression
//!
//! # Architecture
//!
//! Features are vertical slices under [`features`], each split into
//! **commands** (write operations: create, update, delete, login) and
//! **queries** (read operations). Handlers run against the repository
//! traits in [`db`], so every slice is unit-testable against the in-memory
//! catalog double.
//!
//! ## Request Admission
//!
//! Two policies guard the API, both answering `429` with an empty body:
//!
//! - The login route is metered per client IP with a fixed window, cutting
//!   off credential guessing from a single address
//! - The catalog routes are metered per bearer token with token buckets;
//!   an empty bucket queues a bounded number of requests instead of
//!   failing them immediately
//!
//! Admission runs before authentication, so an over-budget request never
//! reaches the token check.
//!
//! ## Framework Stack
//!
//! - **Axum**: Modern, ergonomic web framework
//! - **SQLx**: Async PostgreSQL driver for the stored procedure calls
//! - **Tower**: Middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use catalog_server::config::Config;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     println!(
//!         "catalog server would bind {}:{}",
//!         config.server.host, config.server.port
//!     );
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod features;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use features::FeatureState;
