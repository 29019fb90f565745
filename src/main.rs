//! tick_momentum - Main Entry Point
//!
//! Liquidates any existing position in the configured symbol, then trades it
//! on consecutive-tick momentum until interrupted.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tick_momentum::config::{load_config, AppSettings};
use tick_momentum::{AlpacaRestClient, MomentumStrategy, Trader, TraderSettings};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level or filter directive (overrides settings.log_level)
    #[arg(long, env = "LOG_LEVEL")]
    log_level: Option<String>,

    /// Symbol to trade (overrides strategy.symbol)
    #[arg(long)]
    symbol: Option<String>,

    /// Do not sell the existing position before trading
    #[arg(long)]
    no_liquidate: bool,
}

/// Install stdout and file logging; the guard must live until exit
fn init_logging(settings: &AppSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(&settings.log_level)
        .with_context(|| format!("Invalid log level '{}'", settings.log_level))?;

    let (file_layer, guard) = match settings.log_file.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .context("settings.log_file has no file name")?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_line_number(true))
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let mut config = load_config(Some(args.config.as_str()))?;
    if let Some(level) = args.log_level {
        config.settings.log_level = level;
    }
    if let Some(symbol) = args.symbol {
        config.strategy.symbol = symbol;
    }
    if args.no_liquidate {
        config.settings.liquidate_on_startup = false;
    }
    config.normalize();

    let _log_guard = init_logging(&config.settings)?;

    info!("Starting tick_momentum");
    info!("Configuration file: {}", args.config);

    config.validate()?;

    let broker = AlpacaRestClient::from_config(
        &config.alpaca,
        Duration::from_secs(config.settings.request_timeout_seconds),
    )?;
    if !broker.ping().await.unwrap_or(false) {
        warn!("Alpaca account endpoint did not answer the startup check, continuing");
    }

    let strategy = MomentumStrategy::new(&config.strategy.symbol, config.strategy.params());
    let mut trader = Trader::new(broker, strategy, TraderSettings::from_config(&config));

    trader
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received shutdown signal, cleaning up...");
        })
        .await?;

    Ok(())
}
