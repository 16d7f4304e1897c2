use anyhow::Context;
use axum::Router;
use list_curation_api::{middleware, routes};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG environment variable controls log level (default: info)
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| "curation.db".to_string());
    let state = routes::AppState::with_database(&PathBuf::from(&db_path))
        .with_context(|| format!("opening curation store at {db_path}"))?;
    info!("curation store ready at {db_path}");

    let app = Router::new()
        .nest("/api/v1", routes::create_api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::cors::create_cors_layer()),
        )
        .with_state(state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8081".to_string());
    let addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("parsing bind address {bind_addr}"))?;
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
