//! rmkit command line entry point

mod cli;
mod commands;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use rmkit_config::Config;
use rmkit_events::diagnostics;
use std::process;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    if let Err(e) = run(cli).await {
        error!("Application error: {e}");
        if json_mode {
            println!("{}", serde_json::json!({ "error": e.to_string() }));
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    config.validate()?;

    logging::init_tracing(&config.logging, cli.global.debug);
    info!("Starting rmkit v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        threads_enabled = rmkit_platform::THREADS_ENABLED,
        "configuration loaded"
    );

    let (event_sender, mut event_receiver) = rmkit_events::channel();
    let guard = diagnostics::install(event_sender);
    let result = commands::execute(cli.command, &config).await;
    drop(guard);

    let mut event_handler = EventHandler::new(cli.global.debug);
    event_handler.drain(&mut event_receiver);

    let output = result?;
    OutputRenderer::new(cli.global.json).render(&output, &event_handler.into_diagnostics())?;

    info!("Command completed successfully");
    Ok(())
}
