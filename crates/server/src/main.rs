//! Bannerline server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use bannerline_api::{AppState, router as api_router};
use bannerline_common::Config;
use bannerline_core::{AnnouncementService, RedisDistributionStore};
use bannerline_db::repositories::AnnouncementRepository;
use fred::interfaces::ClientLike;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bannerline=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting bannerline server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = bannerline_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    bannerline_db::migrate(&db).await?;
    info!("Migrations completed");

    // Connect to the Redis-backed edge cache
    info!("Connecting to edge cache...");
    let fred_config = fred::types::config::Config::from_url(&config.edge_cache.url)
        .expect("Failed to parse edge cache URL");
    let fred_client = fred::clients::Client::new(fred_config, None, None, None);
    fred_client.connect();
    fred_client
        .wait_for_connect()
        .await
        .expect("Failed to connect to edge cache");
    let fred_client = Arc::new(fred_client);
    info!("Connected to edge cache");

    // Initialize repositories and services
    let db = Arc::new(db);
    let announcement_repo = AnnouncementRepository::new(Arc::clone(&db));
    let distribution_store = Arc::new(RedisDistributionStore::new(
        fred_client,
        config.edge_cache.prefix.clone(),
    ));
    let announcement_service = AnnouncementService::new(announcement_repo, distribution_store);

    // Create app state
    let state = AppState {
        announcement_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
