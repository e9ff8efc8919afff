use std::sync::Arc;

use anyhow::Context;

use booknook::{
    agent::Assistant,
    builder::{LLMBackend, LLMBuilder},
    chat::ChatProvider,
    config::AppConfig,
    tools::ToolRegistry,
    tracking::LangSmithClient,
};

/// Gemini provider shared by the assistant and the judge.
pub fn gemini_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn ChatProvider>> {
    let gemini = &config.gemini;
    let mut builder = LLMBuilder::new()
        .backend(LLMBackend::Google)
        .api_key_secret(config.require_gemini_key()?.clone())
        .model(&gemini.model);
    if let Some(base_url) = &gemini.base_url {
        builder = builder.base_url(base_url);
    }
    if let Some(temperature) = gemini.temperature {
        builder = builder.temperature(temperature);
    }
    if let Some(max_tokens) = gemini.max_tokens {
        builder = builder.max_tokens(max_tokens);
    }
    if let Some(timeout) = gemini.timeout_seconds {
        builder = builder.timeout_seconds(timeout);
    }
    let provider = builder.build().context("failed to build Gemini provider")?;
    Ok(Arc::from(provider))
}

pub fn assistant(provider: Arc<dyn ChatProvider>) -> Assistant {
    Assistant::new(provider, ToolRegistry::default())
}

pub fn langsmith_client(config: &AppConfig) -> anyhow::Result<LangSmithClient> {
    let key = config.require_langsmith_key()?.clone();
    let client = LangSmithClient::new(key, Some(config.langsmith.endpoint.clone()))
        .context("invalid LangSmith endpoint")?
        .timeout_seconds(config.langsmith.timeout_seconds);
    Ok(client)
}
