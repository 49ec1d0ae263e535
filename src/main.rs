use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod auth;
mod config;
mod db;
mod errors;
mod middleware;
mod models;
mod routes;
mod services;
mod state;
mod store;
mod supabase;
#[cfg(test)]
mod testing;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ───────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── Config ────────────────────────────────────────────────
    let config = config::Config::from_env()?;
    tracing::info!(env = %config.app_env, "Starting clinic gateway");

    // Read address before moving config into state
    let addr: SocketAddr = format!("{}:{}", config.backend_host, config.backend_port).parse()?;

    // ── Data service ──────────────────────────────────────────
    let db = db::connect(&config)?;
    let app_state = AppState::new(config, db);

    // ── Router ────────────────────────────────────────────────
    let app = routes::app(app_state)
        .layer(CorsLayer::permissive()) // tighten in production
        .layer(TraceLayer::new_for_http());
    tracing::info!(%addr, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
