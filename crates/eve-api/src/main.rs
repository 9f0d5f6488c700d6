//! # eve-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the eve editor.
//! Binds to `HOST:PORT` (default `0.0.0.0:6056`).

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use eve_api::config::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured tracing. `EVE_LOG_FORMAT=json` switches to JSON lines.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("EVE_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let settings = Settings::from_env().context("invalid configuration")?;
    let addr = settings.bind_addr();

    let state = eve_api::bootstrap::bootstrap(settings).await.map_err(|e| {
        tracing::error!("Bootstrap failed: {e}");
        e
    })?;

    let app = eve_api::app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    tracing::info!("eve API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
