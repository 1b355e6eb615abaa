//! # Appointly API
//!
//! The API crate provides the web server for the appointment booking service. It is a
//! thin layer over the scheduling core: handlers parse requests, call the availability
//! engine or the lifecycle manager, and map domain errors onto HTTP responses.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into core operations
//! - **Middleware**: Error-to-response mapping
//! - **Jobs**: Periodic auto-completion of past appointments
//! - **Config**: Environment configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Background tasks
pub mod jobs;
/// Middleware for error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use appointly_core::{AppointmentLifecycleManager, AvailabilityEngine, BookingConfig, Clock};
use appointly_db::{DbPool, SqliteAppointmentStore, SqliteCatalog};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// SQLite connection pool, used directly only by the health check
    pub db_pool: DbPool,
    pub availability: Arc<AvailabilityEngine>,
    pub lifecycle: Arc<AppointmentLifecycleManager>,
}

impl ApiState {
    /// Wires the SQLite-backed catalog and store into the core services.
    pub fn new(db_pool: DbPool, clock: Arc<dyn Clock>, booking: BookingConfig) -> Self {
        let store = Arc::new(SqliteAppointmentStore::new(db_pool.clone()));
        let catalog = Arc::new(SqliteCatalog::new(db_pool.clone()));
        let availability =
            Arc::new(AvailabilityEngine::new(catalog, store.clone(), clock, booking));
        let lifecycle = Arc::new(AppointmentLifecycleManager::new(availability.clone(), store));

        Self {
            db_pool,
            availability,
            lifecycle,
        }
    }
}

/// Builds the application router with all routes attached to `state`
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Available dates and slots
        .merge(routes::availability::routes())
        // Client-facing booking endpoints
        .merge(routes::appointment::routes())
        // Administrative endpoints
        .merge(routes::admin::routes())
        // Attach shared state to all routes
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Starts the API server with the provided configuration and database connection
///
/// Sets up logging, spawns the auto-complete job, and serves until Ctrl-C.
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Create shared state with dependencies
    let state = Arc::new(ApiState::new(db_pool, Arc::new(config.clock()), config.booking));
    info!(
        "Booking in {} with {} minute slots, new appointments start as {}",
        config.timezone, config.booking.slot_step_minutes, config.booking.initial_status
    );

    let auto_complete = jobs::spawn_auto_complete(
        state.lifecycle.clone(),
        Duration::from_secs(config.auto_complete_interval),
    );

    let app = build_router(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Request tracing and timeout
    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    auto_complete.abort();
    info!("Server stopped");
    Ok(())
}
