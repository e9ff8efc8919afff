use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "booknook",
    about = "Book Nook literary assistant and its evaluation harness"
)]
pub struct CliArgs {
    /// Config file to use instead of ~/.config/booknook/config.toml
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Default, PartialEq, Eq)]
pub enum Command {
    /// Talk to the assistant (default)
    #[default]
    Chat,
    /// Score the assistant against the configured dataset
    Eval {
        /// Print the local summary only, without recording an experiment
        #[arg(long)]
        local_only: bool,
    },
    /// Upload the built-in examples to the configured dataset
    Upload,
}
