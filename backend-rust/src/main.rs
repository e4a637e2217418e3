mod config;
mod engine;
mod handlers;
mod registry;
mod store;

use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use config::AppConfig;
use engine::NavEngine;
use registry::load_registry;
use store::MeasurementStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "indoornav_backend=info".into()),
        )
        .init();

    info!("Indoor Nav Backend starting...");

    let config = AppConfig::default();
    let registry = Arc::new(load_registry(&config.registry_file).await);
    let strategy = config.strategy();
    info!("Positioning strategy: {}", strategy.name());

    let engine = Arc::new(NavEngine::new(
        MeasurementStore::new(),
        registry,
        strategy,
        config.rssi_curve,
        config.route_planner,
        config.floor_bounds,
    ));

    // CORS — allow all origins; the mobile clients are served elsewhere
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = handlers::router(engine).layer(cors);

    let addr = format!("0.0.0.0:{}", config.http_port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
