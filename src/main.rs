use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peerprep_match_server::routes::{
    act_on_candidate, comment_created, health_check, post_created, quota_status, record_view,
    relationship_status, select_candidates, upsert_profile,
};
use peerprep_match_server::{open_database, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peerprep_match_server=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PeerPrep Match Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}, base daily views: {}, day boundary: UTC{:+}",
        config.environment,
        config.server_address(),
        config.base_daily_views,
        config.day_boundary_utc_offset_hours
    );

    // Open the ledger store
    let db = open_database(&config.database_path)?;

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .allowed_origins
                .iter()
                .map(|s| s.parse().unwrap())
                .collect::<Vec<_>>(),
        )
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);

    // Create app state
    let state = AppState::new(db, config.clone());

    // Build router
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/candidates", get(select_candidates))
        .route("/api/relationship", post(act_on_candidate).get(relationship_status))
        .route("/api/views", post(record_view))
        .route("/api/quota", get(quota_status))
        .route("/api/events/post", post(post_created))
        .route("/api/events/comment", post(comment_created))
        .route("/api/profiles", post(upsert_profile))
        .layer(cors)
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
