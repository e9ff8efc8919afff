//! Application configuration.
//!
//! Settings come from a TOML file, then `.env`, then the process
//! environment, each layer overriding the previous one.

mod error;
mod load;
mod paths;
mod types;

pub use error::ConfigError;
pub use load::{load_config, read_config, LoadedConfig};
pub use paths::ConfigPaths;
pub use types::{
    AppConfig, GeminiConfig, LangSmithConfig, LoggingConfig, DEFAULT_GEMINI_MODEL,
};
