//! SAP Job Finder Server
//!
//! Web front-end for the LinkedIn Job Search API: a filter sidebar, job
//! cards and pagination, rendered server-side with Axum.

mod config;
mod render;
mod routes;
mod session;
mod store;

use anyhow::Context;
use client::JobSearchClient;
use config::Config;
use routes::AppState;
use store::SessionStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "server=debug,client=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("🚀 Starting SAP Job Finder...");

    let config = Config::from_env();
    let credentials = config.load_credentials();

    let client = JobSearchClient::new()
        .endpoint_path(config.endpoint_path.clone())
        .timeout(config.api_timeout);

    let sessions = SessionStore::with_limits(config.session_ttl, config.max_sessions);
    let app = routes::create_router(AppState::new(client, credentials).sessions(sessions));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    tracing::info!("🌐 Server running at http://{}", config.bind_addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
