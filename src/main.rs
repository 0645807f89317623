use std::path::Path;

use anyhow::{Context, Result};
use checkout_cli::{
    cli::{Args, ConsoleTerminal, StorefrontApp, FAREWELL},
    services::Catalog,
    utils::Config,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loaded before the subscriber exists because it decides the log level.
    let config = Config::load(args.config.as_deref().map(Path::new))?;

    tracing_subscriber::fmt()
        .with_env_filter(args.env_filter(&config.log_level))
        .with_writer(std::io::stderr)
        .init();

    if args.no_color {
        console::set_colors_enabled(false);
    }

    tracing::info!("🦀 Checkout CLI starting...");
    tracing::info!(
        "Configuration loaded for {} environment",
        config.environment
    );
    tracing::debug!(
        "Log level {}, currency {}, production: {}",
        config.log_level,
        config.currency,
        config.is_production()
    );

    let shutdown = CancellationToken::new();
    let worker = tokio::task::spawn_blocking({
        let shutdown = shutdown.clone();
        let config = config.clone();
        move || {
            let mut app = StorefrontApp::new(ConsoleTerminal::new(), Catalog::seeded(), &config);
            app.run(&shutdown)
        }
    });

    tokio::select! {
        result = worker => {
            result.context("Storefront worker panicked")??;
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl+C")?;
            shutdown.cancel();
            println!("\n{}", FAREWELL);
            tracing::info!("🦀 Checkout CLI interrupted");
            // The worker is parked on a blocking stdin read that cannot be cancelled.
            std::process::exit(0);
        }
    }

    tracing::info!("🦀 Checkout CLI stopped");
    Ok(())
}
