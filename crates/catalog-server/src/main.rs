//! Catalog Server - Main entry point

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use catalog_common::logging::{init_logging, LogConfig};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use catalog_server::{
    auth::TokenService,
    config::Config,
    db::{PgBrandRepository, PgProductRepository, PgUserRepository, QueryExecutor},
    features,
    middleware::{self, FixedWindowPolicy, TokenBucketPolicy},
};

/// State for the plain handlers outside the feature slices; currently just
/// the pool behind the health probe
#[derive(Clone)]
struct HealthState {
    db: sqlx::PgPool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("catalog-server".to_string())
        .filter_directives(
            "catalog_server=debug,tower_http=debug,axum=trace,sqlx=info".to_string(),
        )
        .build();

    // Environment settings win over the built-in defaults
    let log_config = LogConfig::from_env().unwrap_or(log_config);

    init_logging(&log_config)?;

    info!("Starting Catalog Server");

    let config = Config::load()?;
    info!(
        host = %config.server.host,
        port = config.server.port,
        "Configuration loaded"
    );

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.database.idle_timeout_secs))
        .connect(&config.database.url)
        .await?;

    info!("Connected to Postgres; pool ready");

    // Wire the repositories and token service for the feature routers
    let executor = QueryExecutor::new(db_pool.clone());
    let feature_state = features::FeatureState {
        brands: Arc::new(PgBrandRepository::new(executor.clone())),
        products: Arc::new(PgProductRepository::new(executor.clone())),
        users: Arc::new(PgUserRepository::new(executor)),
        tokens: TokenService::new(
            &config.auth.jwt_secret,
            &config.auth.issuer,
            &config.auth.audience,
            config.auth.token_lifetime_minutes,
        ),
    };

    // Admission policies and their periodic upkeep
    let login_window = Arc::new(FixedWindowPolicy::new(
        config.admission.login_permit_limit,
        config.admission.login_window_secs,
    ));
    let token_buckets = Arc::new(TokenBucketPolicy::new(
        config.admission.bucket_capacity,
        config.admission.bucket_replenish_amount,
        config.admission.bucket_queue_limit,
        config.admission.bucket_idle_after_secs,
    ));
    let _maintenance = middleware::spawn_admission_maintenance(
        login_window.clone(),
        token_buckets.clone(),
        Duration::from_secs(config.admission.bucket_replenish_period_secs),
    );

    info!("Admission policies initialized");

    let app = create_router(
        HealthState { db: db_pool },
        feature_state,
        login_window,
        token_buckets,
        &config,
    );

    // validate() guarantees the host parses as an IP
    let ip: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(ip, config.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    // Connection info feeds the per-IP login window
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
    .await?;

    info!("Shutdown complete");

    Ok(())
}

/// Assemble the full router: health probe, versioned API, outer middleware
fn create_router(
    state: HealthState,
    feature_state: features::FeatureState,
    login_window: Arc<FixedWindowPolicy>,
    token_buckets: Arc<TokenBucketPolicy>,
    config: &Config,
) -> Router {
    // Feature routes carry their own admission and auth layers
    let feature_routes = features::router(feature_state, login_window, token_buckets);

    // Later layers wrap earlier ones; CORS sits outermost
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", feature_routes)
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Liveness probe reporting database reachability
async fn health_check(State(state): State<HealthState>) -> Result<Response, StatusCode> {
    if let Err(e) = sqlx::query("SELECT 1").fetch_one(&state.db).await {
        tracing::error!("Health probe could not reach the database: {:?}", e);
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let body = Json(json!({
        "status": "healthy",
        "database": "connected"
    }));
    Ok((StatusCode::OK, body).into_response())
}

/// Resolves when Ctrl+C or SIGTERM arrives, then holds the listener open
/// briefly so clients in the middle of a request can finish
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Could not install the Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => tracing::error!("Could not install the SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl+C received; draining connections"),
        _ = terminate => info!("SIGTERM received; draining connections"),
    }

    // Short drain window before the listener closes; capped so restarts
    // stay quick even with a long configured timeout
    info!("Allowing up to {} seconds for open requests", timeout_secs.min(5));
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
