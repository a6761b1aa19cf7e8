use std::time::Duration;

use axum::http::{HeaderValue, Method};
use nurture_backend::config::AppConfig;
use nurture_backend::io::refresh::spawn_prediction_ticker;
use nurture_backend::{create_router, initialize_backend};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Loading configuration");
    let config = AppConfig::load()?;

    info!("Setting up application state");
    let app_state = initialize_backend(&config)?;

    let _ticker = spawn_prediction_ticker(
        app_state.sleep_tracker.clone(),
        app_state.prediction_feed.clone(),
        Duration::from_secs(config.refresh_interval_secs),
    );

    // CORS setup to allow the app's dev server to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
