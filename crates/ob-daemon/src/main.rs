//! ob-daemon entry point.
//!
//! Thin on purpose: loads configuration, sets up tracing, builds the shared
//! state, wires static hosting and middleware, and serves until Ctrl-C.
//! Handlers live in `routes.rs` and `ws.rs`; shared state in `state.rs`.

use std::{path::Path, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use ob_daemon::{config::DaemonConfig, routes, state::AppState};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env.local if present (dev convenience). Silent if missing.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cfg = DaemonConfig::parse();

    // Constructed once; dropped when the server future returns.
    let shared = Arc::new(AppState::new(usize::from(cfg.bus_capacity)));

    if !cfg.public_dir.is_dir() {
        warn!(public_dir = %cfg.public_dir.display(), "static asset directory not found");
    }

    let app = routes::build_router(Arc::clone(&shared))
        .fallback_service(static_assets(&cfg.public_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors(&cfg.cors_origins));

    let listener = tokio::net::TcpListener::bind(cfg.addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.addr))?;
    info!("ob-daemon listening on http://{}", cfg.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    info!("ob-daemon stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn static_assets(dir: &Path) -> ServeDir {
    ServeDir::new(dir).append_index_html_on_directories(true)
}

fn cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o.trim()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET])
        .allow_headers(tower_http::cors::Any)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
