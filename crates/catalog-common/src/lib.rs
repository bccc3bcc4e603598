//! Catalog Common Library
//!
//! Shared infrastructure for the catalog workspace members.
//!
//! # Overview
//!
//! This crate currently provides one concern shared by every binary in the
//! workspace:
//!
//! - **Logging**: configuration and initialization of the `tracing`
//!   subscriber stack (console and daily-rolling file outputs, text or
//!   JSON rendering, `EnvFilter` directives)
//!
//! # Example
//!
//! ```no_run
//! use catalog_common::logging::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::from_env()?;
//!     init_logging(&config)?;
//!     tracing::info!("Application started");
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod logging;

// Re-export commonly used types
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel, LogOutput};
