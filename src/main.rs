//! Biblios Server - Library Management System
//!
//! REST API server for a small library: catalogs, members, take-home
//! loans and in-library reading logs.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biblios_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("biblios_server={},tower_http=debug", config.logging.level).into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Biblios Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.telegram.clone())
        .await
        .expect("Failed to create services");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Start the overdue-reminder sweep
    tokio::spawn(biblios_server::services::reminders::run(state.clone()));

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Catalogs
        .route("/catalogs", get(api::catalogs::list_catalogs))
        .route("/catalogs", post(api::catalogs::create_catalog))
        .route("/catalogs/:id", get(api::catalogs::get_catalog))
        .route("/catalogs/:id", put(api::catalogs::update_catalog))
        .route("/catalogs/:id", delete(api::catalogs::delete_catalog))
        .route("/catalogs/:id/books", post(api::catalogs::create_book))
        // Books (physical copies)
        .route("/books/:id", get(api::catalogs::get_book))
        .route("/books/:id", delete(api::catalogs::delete_book))
        .route("/books/barcode/:barcode", get(api::catalogs::get_book_by_barcode))
        // Members
        .route("/members", get(api::members::list_members))
        .route("/members", post(api::members::create_member))
        .route("/members/:id", get(api::members::get_member))
        .route("/members/:id", put(api::members::update_member))
        .route("/members/:id", delete(api::members::delete_member))
        .route("/members/:id/loans", get(api::members::get_member_loans))
        // Loans
        .route("/loans", get(api::loans::list_loans))
        .route("/loans", post(api::loans::create_loan))
        .route("/loans/:id", get(api::loans::get_loan))
        .route("/loans/:id", put(api::loans::update_loan))
        .route("/loans/:id", delete(api::loans::delete_loan))
        .route("/loans/:id/return", post(api::loans::return_loan))
        .route("/loans/:id/unreturn", post(api::loans::unreturn_loan))
        // Library logs
        .route("/library-logs", get(api::library_logs::list_logs))
        .route("/library-logs", post(api::library_logs::create_log))
        .route("/library-logs/:id", get(api::library_logs::get_log))
        .route("/library-logs/:id", put(api::library_logs::update_log))
        .route("/library-logs/:id", delete(api::library_logs::delete_log))
        .route("/library-logs/:id/approve", post(api::library_logs::approve_log))
        .route("/library-logs/:id/return", post(api::library_logs::return_log_items))
        .route("/library-logs/:id/unreturn", post(api::library_logs::unreturn_log_items))
        .route("/library-logs/:id/to-pending", post(api::library_logs::log_to_pending))
        // Histories
        .route("/histories", get(api::histories::list_histories))
        // Statistics
        .route("/stats", get(api::stats::get_stats))
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
