use std::path::PathBuf;

use super::error::ConfigError;

const APP_DIR: &str = "booknook";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_file: PathBuf,
    pub logs_dir: PathBuf,
}

impl ConfigPaths {
    /// `~/.config/booknook/config.toml` unless overridden; logs always go
    /// under `~/.local/share/booknook/logs`.
    pub fn resolve(config_override: Option<PathBuf>) -> Result<Self, ConfigError> {
        let config_file = match config_override {
            Some(path) => path,
            None => default_config_dir()?.join("config.toml"),
        };
        Ok(Self {
            config_file,
            logs_dir: default_data_dir()?.join("logs"),
        })
    }
}

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::MissingHome)
}

fn default_config_dir() -> Result<PathBuf, ConfigError> {
    Ok(home()?.join(".config").join(APP_DIR))
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    Ok(home()?.join(".local").join("share").join(APP_DIR))
}
