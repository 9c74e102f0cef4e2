use std::sync::Arc;

use anyhow::{Context, Result};
use callsight::{AppState, Config, InsightEngine, RuleCatalog, SessionStore};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "callsight", about = "Real-time conversation insight service")]
struct Cli {
    /// Path to the config file (extension optional)
    #[arg(long, default_value = "config/callsight")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;
    let port = cli.port.unwrap_or(cfg.service.http.port);

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", cfg.service.environment);
    info!(
        "Insight window: {}",
        if cfg.analysis.window_size == 0 {
            "all segments".to_string()
        } else {
            format!("last {} segments", cfg.analysis.window_size)
        }
    );

    let engine = InsightEngine::new(RuleCatalog::builtin(), cfg.analysis.window_size);
    let store = Arc::new(SessionStore::new(engine));
    let state = AppState::new(store, cfg.service.environment.clone());
    let app = callsight::create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server exited")?;

    Ok(())
}
