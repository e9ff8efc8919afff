mod chat;
mod eval;
mod upload;

use booknook::config::AppConfig;

use crate::args::Command;

pub async fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Chat => chat::run(config).await,
        Command::Eval { local_only } => eval::run(config, local_only).await,
        Command::Upload => upload::run(config).await,
    }
}
