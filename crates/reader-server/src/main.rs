mod config;
mod error;
mod server;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reader_common::analyst::BookAnalyst;
use reader_common::openai::ChatClient;

use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to read .env: {e}");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("starting reader-server");

    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        base_url = %config.zhipu.base_url,
        model = %config.model,
        timeout_secs = ?config.zhipu.timeout.map(|t| t.as_secs()),
        "configuration loaded"
    );

    let client = ChatClient::new(config.zhipu.clone())?;
    let analyst = BookAnalyst::new(Arc::new(client), config.model.clone());
    let app = server::router(analyst);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "HTTP server error"))?;

    info!("HTTP server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install Ctrl-C handler, running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
