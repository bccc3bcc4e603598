//! Configuration management

use serde::{Deserialize, Serialize};

// ============================================================================
// Server Configuration Constants
// ============================================================================

/// Default server host binding.
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default shutdown timeout in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Default database URL for local development.
pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost/catalog";

/// Default maximum database connections in the pool.
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default minimum database connections in the pool.
pub const DEFAULT_DATABASE_MIN_CONNECTIONS: u32 = 2;

/// Default database connection timeout in seconds.
pub const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default database idle timeout in seconds (10 minutes).
pub const DEFAULT_DATABASE_IDLE_TIMEOUT_SECS: u64 = 600;

/// Placeholder signing secret; `validate` warns whenever it is still in use.
pub const DEFAULT_TOKEN_SECRET: &str = "development-secret-change-me";

/// Default token issuer claim.
pub const DEFAULT_TOKEN_ISSUER: &str = "catalog-api";

/// Default token audience claim.
pub const DEFAULT_TOKEN_AUDIENCE: &str = "catalog-clients";

/// Default bearer token lifetime in minutes.
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 10;

/// Default login attempts allowed per client IP per window.
pub const DEFAULT_LOGIN_PERMIT_LIMIT: u32 = 5;

/// Default login window length in seconds (5 minutes).
pub const DEFAULT_LOGIN_WINDOW_SECS: u64 = 300;

/// Default token bucket capacity per bearer token.
pub const DEFAULT_BUCKET_CAPACITY: u32 = 10;

/// Default tokens added to each bucket per replenish pass.
pub const DEFAULT_BUCKET_REPLENISH_AMOUNT: u32 = 5;

/// Default replenish period in seconds (5 minutes).
pub const DEFAULT_BUCKET_REPLENISH_PERIOD_SECS: u64 = 300;

/// Default number of requests allowed to queue per empty bucket.
pub const DEFAULT_BUCKET_QUEUE_LIMIT: usize = 5;

/// Default idle time before an untouched full bucket is evicted (1 hour).
pub const DEFAULT_BUCKET_IDLE_AFTER_SECS: u64 = 3600;

/// Default CORS allowed origin for local development.
pub const DEFAULT_CORS_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admission: AdmissionConfig,
    pub cors: CorsConfig,
}

/// Server-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_timeout_secs: u64,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

/// Bearer token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_lifetime_minutes: i64,
}

/// Request admission configuration: the login fixed window and the
/// per-token buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionConfig {
    pub login_permit_limit: u32,
    pub login_window_secs: u64,
    pub bucket_capacity: u32,
    pub bucket_replenish_amount: u32,
    pub bucket_replenish_period_secs: u64,
    pub bucket_queue_limit: usize,
    pub bucket_idle_after_secs: u64,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            server: ServerConfig {
                host: std::env::var("CATALOG_HOST")
                    .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: std::env::var("CATALOG_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SERVER_PORT),
                shutdown_timeout_secs: std::env::var("CATALOG_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
                min_connections: std::env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_MIN_CONNECTIONS),
                connect_timeout_secs: std::env::var("DATABASE_CONNECT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS),
                idle_timeout_secs: std::env::var("DATABASE_IDLE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_DATABASE_IDLE_TIMEOUT_SECS),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET")
                    .unwrap_or_else(|_| DEFAULT_TOKEN_SECRET.to_string()),
                issuer: std::env::var("JWT_ISSUER")
                    .unwrap_or_else(|_| DEFAULT_TOKEN_ISSUER.to_string()),
                audience: std::env::var("JWT_AUDIENCE")
                    .unwrap_or_else(|_| DEFAULT_TOKEN_AUDIENCE.to_string()),
                token_lifetime_minutes: std::env::var("JWT_LIFETIME_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TOKEN_LIFETIME_MINUTES),
            },
            admission: AdmissionConfig {
                login_permit_limit: std::env::var("LOGIN_PERMIT_LIMIT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_LOGIN_PERMIT_LIMIT),
                login_window_secs: std::env::var("LOGIN_WINDOW_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_LOGIN_WINDOW_SECS),
                bucket_capacity: std::env::var("TOKEN_BUCKET_CAPACITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BUCKET_CAPACITY),
                bucket_replenish_amount: std::env::var("TOKEN_BUCKET_REPLENISH_AMOUNT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BUCKET_REPLENISH_AMOUNT),
                bucket_replenish_period_secs: std::env::var("TOKEN_BUCKET_REPLENISH_PERIOD_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BUCKET_REPLENISH_PERIOD_SECS),
                bucket_queue_limit: std::env::var("TOKEN_BUCKET_QUEUE_LIMIT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BUCKET_QUEUE_LIMIT),
                bucket_idle_after_secs: std::env::var("TOKEN_BUCKET_IDLE_AFTER_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_BUCKET_IDLE_AFTER_SECS),
            },
            cors: CorsConfig {
                allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| DEFAULT_CORS_ALLOWED_ORIGIN.to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                allow_credentials: std::env::var("CORS_ALLOW_CREDENTIALS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(true),
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        // Validate bind address
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.host.parse::<std::net::IpAddr>().is_err() {
            anyhow::bail!("Server host '{}' is not a valid IP address", self.server.host);
        }

        // Validate database URL
        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }

        // Validate connection pool settings
        if self.database.max_connections == 0 {
            anyhow::bail!("Database max_connections must be greater than 0");
        }

        if self.database.min_connections > self.database.max_connections {
            anyhow::bail!(
                "Database min_connections ({}) cannot be greater than max_connections ({})",
                self.database.min_connections,
                self.database.max_connections
            );
        }

        // Validate token settings
        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret cannot be empty");
        }

        if self.auth.jwt_secret == DEFAULT_TOKEN_SECRET {
            tracing::warn!("JWT_SECRET not set - using the development placeholder secret");
        }

        if self.auth.token_lifetime_minutes <= 0 {
            anyhow::bail!("Token lifetime must be greater than 0 minutes");
        }

        // Validate admission settings
        if self.admission.login_permit_limit == 0 {
            anyhow::bail!("Login permit limit must be greater than 0");
        }

        if self.admission.login_window_secs == 0 {
            anyhow::bail!("Login window must be greater than 0 seconds");
        }

        if self.admission.bucket_capacity == 0 {
            anyhow::bail!("Token bucket capacity must be greater than 0");
        }

        if self.admission.bucket_replenish_amount == 0 {
            anyhow::bail!("Token bucket replenish amount must be greater than 0");
        }

        if self.admission.bucket_replenish_period_secs == 0 {
            anyhow::bail!("Token bucket replenish period must be greater than 0 seconds");
        }

        // Validate CORS origins
        if self.cors.allowed_origins.is_empty() {
            tracing::warn!("No CORS origins configured - all origins will be allowed");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_SERVER_HOST.to_string(),
                port: DEFAULT_SERVER_PORT,
                shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            },
            database: DatabaseConfig {
                url: DEFAULT_DATABASE_URL.to_string(),
                max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
                min_connections: DEFAULT_DATABASE_MIN_CONNECTIONS,
                connect_timeout_secs: DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
                idle_timeout_secs: DEFAULT_DATABASE_IDLE_TIMEOUT_SECS,
            },
            auth: AuthConfig {
                jwt_secret: DEFAULT_TOKEN_SECRET.to_string(),
                issuer: DEFAULT_TOKEN_ISSUER.to_string(),
                audience: DEFAULT_TOKEN_AUDIENCE.to_string(),
                token_lifetime_minutes: DEFAULT_TOKEN_LIFETIME_MINUTES,
            },
            admission: AdmissionConfig {
                login_permit_limit: DEFAULT_LOGIN_PERMIT_LIMIT,
                login_window_secs: DEFAULT_LOGIN_WINDOW_SECS,
                bucket_capacity: DEFAULT_BUCKET_CAPACITY,
                bucket_replenish_amount: DEFAULT_BUCKET_REPLENISH_AMOUNT,
                bucket_replenish_period_secs: DEFAULT_BUCKET_REPLENISH_PERIOD_SECS,
                bucket_queue_limit: DEFAULT_BUCKET_QUEUE_LIMIT,
                bucket_idle_after_secs: DEFAULT_BUCKET_IDLE_AFTER_SECS,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ALLOWED_ORIGIN.to_string()],
                allow_credentials: true,
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
