use chore_board_backend::config::BoardConfig;
use chore_board_backend::{create_router, initialize_backend};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BoardConfig::from_env();
    let addr = config.http_addr;

    let state = initialize_backend(config).await?;
    let shutdown = state.shutdown.clone();
    let app = create_router(state);

    // Start the server
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, cancelling pending reminders and in-flight assigns
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
    shutdown.cancel();
}
