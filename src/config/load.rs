use std::fs;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::paths::ConfigPaths;
use super::types::AppConfig;

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub paths: ConfigPaths,
    pub config_exists: bool,
}

/// Reads the config file (a missing file means defaults), then `.env`,
/// then the process environment.
pub fn load_config(path_override: Option<PathBuf>) -> Result<LoadedConfig, ConfigError> {
    let paths = ConfigPaths::resolve(path_override)?;
    let (mut config, config_exists) = read_config(&paths.config_file)?;
    if let Ok(env_file) = dotenvy::dotenv() {
        log::debug!("loaded environment from {}", env_file.display());
    }
    config.apply_env(|name| std::env::var(name).ok());
    fs::create_dir_all(&paths.logs_dir)?;
    Ok(LoadedConfig {
        config,
        paths,
        config_exists,
    })
}

/// Parses `path`, returning defaults and `false` when it does not exist.
pub fn read_config(path: &Path) -> Result<(AppConfig, bool), ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok((toml::from_str(&contents)?, true)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok((AppConfig::default(), false)),
        Err(err) => Err(ConfigError::Io(err)),
    }
}
