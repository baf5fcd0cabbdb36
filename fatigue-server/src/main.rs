//! fatigue-server - astronaut fatigue assessment service
//!
//! Serves POST /api/calculate_fatigue. The scorer is chosen at startup:
//! rule-based arithmetic (default) or the Gemini text model.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fatigue_common::config::{
    load_toml_config, log_filter_directives, ConfigOverrides, ScorerKind, ServerConfig, DEFAULT_LOG_LEVEL,
};
use fatigue_server::{build_router, build_scorer, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for fatigue-server
#[derive(Parser, Debug)]
#[command(name = "fatigue-server")]
#[command(about = "Astronaut fatigue assessment service")]
#[command(version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "FATIGUE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FATIGUE_PORT")]
    port: Option<u16>,

    /// Scorer backing the endpoint: rules or gemini
    #[arg(long, env = "FATIGUE_SCORER")]
    scorer: Option<ScorerKind>,

    /// Gemini API key (required for the gemini scorer)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL")]
    gemini_model: Option<String>,

    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FATIGUE_LOG_LEVEL")]
    log_level: Option<String>,

    /// TOML config file
    #[arg(short, long, env = "FATIGUE_CONFIG")]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            scorer: self.scorer,
            gemini_api_key: self.gemini_api_key.clone(),
            gemini_model: self.gemini_model.clone(),
            cors: self.no_cors.then_some(false),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Subscriber goes in before config loading so its events are kept.
    // RUST_LOG wins; otherwise the level is refined once TOML is resolved.
    let rust_log = EnvFilter::try_from_default_env().ok();
    let follow_config = rust_log.is_none();
    let initial_filter = rust_log.unwrap_or_else(|| {
        let level = args.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        EnvFilter::new(log_filter_directives(level))
    });
    let (filter, filter_handle) = reload::Layer::new(initial_filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let toml = load_toml_config(args.config.as_deref()).context("Failed to load config file")?;
    let config = ServerConfig::resolve(args.overrides(), toml).context("Invalid configuration")?;

    if follow_config {
        filter_handle
            .reload(EnvFilter::new(log_filter_directives(&config.log_level)))
            .context("Failed to apply configured log level")?;
    }

    info!(
        "Starting fatigue-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Scorer: {}", config.scorer);
    if let Some(gemini) = &config.gemini {
        info!("Gemini model: {}", gemini.model);
    }
    info!("CORS: {}", if config.cors { "enabled" } else { "disabled" });

    let scorer = build_scorer(&config).context("Failed to initialize scorer")?;
    let state = AppState::from_config(&config, scorer);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
