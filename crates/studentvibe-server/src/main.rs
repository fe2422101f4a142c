//! StudentVibe HTTP server

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use studentvibe_core::{EngineKind, Humanizer, HumanizerConfig};
use studentvibe_server::{router, AppState};
use tracing::{info, warn};

/// Server arguments
#[derive(Parser, Debug)]
#[command(name = "studentvibe-server")]
#[command(about = "Rewrite machine-generated text in a student's voice over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// TOML config file (falls back to $STUDENTVIBE_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let config = HumanizerConfig::load(args.config.as_deref()).context("loading configuration")?;
    if config.engine == EngineKind::Gemini && config.generation.api_key.is_none() {
        warn!(
            var = %config.generation.api_key_var,
            "No API key configured; humanize requests will fail until it is set"
        );
    }

    let humanizer = Humanizer::from_config(&config)
        .await
        .context("initialising humanizer")?;
    let app = router(AppState::new(humanizer));

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
