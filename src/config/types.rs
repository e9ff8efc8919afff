use secrecy::SecretString;
use serde::Deserialize;

use crate::evaluator::DEFAULT_MAX_CONCURRENCY;
use crate::tracking::DEFAULT_ENDPOINT;

use super::error::ConfigError;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_LOG_ROTATE_SIZE: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_ROTATE_KEEP: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub langsmith: LangSmithConfig,
    pub logging: LoggingConfig,
}

/// Model used both by the assistant and by the judge.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub model: String,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            base_url: None,
            temperature: Some(0.0),
            max_tokens: None,
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LangSmithConfig {
    pub api_key: Option<SecretString>,
    pub endpoint: String,
    pub dataset_id: Option<String>,
    pub max_concurrency: usize,
    pub timeout_seconds: Option<u64>,
}

impl Default for LangSmithConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            dataset_id: None,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub path: Option<String>,
    pub rotate_size: u64,
    pub rotate_keep: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: None,
            rotate_size: DEFAULT_LOG_ROTATE_SIZE,
            rotate_keep: DEFAULT_LOG_ROTATE_KEEP,
        }
    }
}

impl AppConfig {
    /// Applies environment overrides. Variables set to an empty string are
    /// treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = var("GEMINI_MODEL") {
            self.gemini.model = model;
        }
        if let Some(key) = var("GEMINI_API_KEY") {
            self.gemini.api_key = Some(SecretString::new(key));
        }
        if let Some(key) = var("LANGSMITH_API_KEY") {
            self.langsmith.api_key = Some(SecretString::new(key));
        }
        if let Some(endpoint) = var("LANGSMITH_ENDPOINT") {
            self.langsmith.endpoint = endpoint;
        }
        if let Some(dataset_id) = var("DATASET_ID") {
            self.langsmith.dataset_id = Some(dataset_id);
        }
        if let Some(level) = var("BOOKNOOK_LOG") {
            self.logging.level = level;
        }
    }

    pub fn require_gemini_key(&self) -> Result<&SecretString, ConfigError> {
        self.gemini
            .api_key
            .as_ref()
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))
    }

    pub fn require_langsmith_key(&self) -> Result<&SecretString, ConfigError> {
        self.langsmith
            .api_key
            .as_ref()
            .ok_or(ConfigError::Missing("LANGSMITH_API_KEY"))
    }

    pub fn require_dataset_id(&self) -> Result<&str, ConfigError> {
        self.langsmith
            .dataset_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::Missing("DATASET_ID"))
    }
}
