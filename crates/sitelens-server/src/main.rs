use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use sitelens_client::{ClientFactory, Credentials, FactoryConfig};
use sitelens_server::routes;
use sitelens_server::state::{AppState, DEFAULT_HISTORY_LIMIT};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sitelens=info".parse()?))
        .with_target(false)
        .init();

    let port = std::env::var("SITELENS_SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let history_limit = match std::env::var("SITELENS_HISTORY_LIMIT") {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Invalid SITELENS_HISTORY_LIMIT '{raw}'"))?,
        Err(_) => DEFAULT_HISTORY_LIMIT,
    };

    let factory = ClientFactory::new(FactoryConfig::from_env()?);
    let state = Arc::new(AppState::with_history_limit(
        factory,
        Credentials::from_env(),
        history_limit,
    ));
    let shutdown = state.shutdown.clone();

    tracing::info!(
        providers = ?state.factory.available_providers(),
        "Provider registry loaded"
    );

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

/// Waits for Ctrl-C, then cancels every in-flight analysis.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
    shutdown.cancel();
}
