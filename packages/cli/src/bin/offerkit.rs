// ABOUTME: Offerkit server entry point
// ABOUTME: Loads configuration, opens the database, and serves the API

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use offerkit_ai::{GeneratorConfig, ProposalGenerator};
use offerkit_api::{create_health_router, create_proposals_router, AppState};
use offerkit_cli::Config;
use offerkit_export::BlobClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    if config.primary_api_key.is_none() {
        warn!("OPENAI_API_KEY not set - proposal generation will fail until it is configured");
    }
    if config.blob_token.is_none() {
        warn!("BLOB_READ_WRITE_TOKEN not set - document exports will not be published");
    }

    let pool = offerkit_storage::create_pool(&config.db_path).await?;
    offerkit_storage::run_migrations(&pool).await?;
    info!("Database ready at {}", config.db_path.display());

    let generator = ProposalGenerator::new(GeneratorConfig {
        primary_api_key: config.primary_api_key.clone(),
        fallback_api_key: config.fallback_api_key.clone(),
    });
    let blob = BlobClient::new(config.blob_token.clone());
    let state = AppState::new(pool, generator, blob);

    let app = Router::new()
        .nest("/api/proposals", create_proposals_router())
        .nest("/api/health", create_health_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Offerkit server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
