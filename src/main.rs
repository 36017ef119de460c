use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use knitting_diary::{
    cli::Cli,
    graceful_shutdown::cancel_on_shutdown,
    handlers::dispatch,
    routes::Route,
    settings::AppConfig,
    ui::console::{ConsoleConfirmer, ConsoleNavigator, ConsoleNotifier},
    AppState,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive())),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_file = cli.config.as_deref().map(|p| p.to_string_lossy().into_owned());
    let config = AppConfig::load(config_file.as_deref()).context("Configuration error")?;
    tracing::debug!(backend = %config.backend_host, env = %config.env, "Loaded configuration");

    let state = AppState::new(
        config,
        Arc::new(ConsoleNotifier),
        Arc::new(ConsoleNavigator::new(Route::default())),
        Arc::new(ConsoleConfirmer::new(cli.yes)),
    )?;

    let watcher = cancel_on_shutdown(state.shutdown.clone());
    let result = dispatch(&state, cli.command).await;
    state.shutdown.cancel();
    watcher.await.ok();

    result
}
