mod api;
mod config;
mod dashboard_state;
mod feed;
mod models;
mod poller;
mod sample;

use anyhow::Result;
use chrono::Utc;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    config::Config, dashboard_state::DashboardState, feed::FeedClient, poller::PollService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent; env vars may be set externally)
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env()?;

    // Shared state everything renders from
    let state = DashboardState::new(Utc::now());

    // Feed client plus the service driving acquisition cycles
    let client = FeedClient::new(
        config.feed_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    );
    let service = PollService::new(client, state);

    // Background polling and clock loops; the first cycle runs immediately
    let controller = service.clone().spawn(
        Duration::from_secs(config.poll_interval_secs),
        Duration::from_secs(config.clock_interval_secs),
    );

    // Start HTTP server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, feed_url = %service.feed_url(), "HTTP server listening");

    axum::serve(listener, api::router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
