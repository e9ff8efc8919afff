#[path = "booknook/args.rs"]
mod args;
#[path = "booknook/commands/mod.rs"]
mod commands;
#[path = "booknook/logging.rs"]
mod logging;
#[path = "booknook/runtime.rs"]
mod runtime;

use anyhow::Context;
use clap::Parser;

use booknook::config::load_config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = args::CliArgs::parse();
    let loaded = load_config(args.config.clone()).context("failed to load configuration")?;
    let _logger = logging::init_logging(&loaded.config.logging, &loaded.paths)?;
    log::info!(
        "booknook starting (config {}, found: {})",
        loaded.paths.config_file.display(),
        loaded.config_exists
    );
    commands::run(args.command.unwrap_or_default(), &loaded.config).await
}
