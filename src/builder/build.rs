use secrecy::ExposeSecret;

use crate::{backends::google::Google, chat::ChatProvider, error::LLMError};

use super::backend::LLMBackend;
use super::llm_builder::LLMBuilder;
use super::state::BuilderState;

impl LLMBuilder {
    pub fn build(self) -> Result<Box<dyn ChatProvider>, LLMError> {
        self.state.build()
    }
}

impl BuilderState {
    fn build(mut self) -> Result<Box<dyn ChatProvider>, LLMError> {
        log_builder_state(&self);
        let backend = self
            .backend
            .take()
            .ok_or_else(|| LLMError::InvalidRequest("No backend specified".to_string()))?;

        match backend {
            LLMBackend::Google => self.build_google(),
        }
    }

    fn build_google(mut self) -> Result<Box<dyn ChatProvider>, LLMError> {
        let api_key = self.require_api_key("Google")?;
        let provider = Google::with_base_url(
            reqwest::Client::new(),
            self.base_url.take(),
            api_key,
            self.model.take(),
            self.max_tokens,
            self.temperature,
            self.timeout_seconds,
            None,
        )?;
        Ok(Box::new(provider))
    }

    fn require_api_key(&mut self, provider: &str) -> Result<String, LLMError> {
        let Some(key) = self.api_key.take() else {
            return Err(LLMError::InvalidRequest(format!(
                "No API key provided for {provider}"
            )));
        };
        Ok(key.expose_secret().to_string())
    }
}

fn log_builder_state(state: &BuilderState) {
    log::debug!(
        "Building LLM provider. backend={:?} model={:?} temp={:?} timeout={:?}",
        state.backend,
        state.model,
        state.temperature,
        state.timeout_seconds,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_without_backend_fails() {
        let err = LLMBuilder::new().api_key("k").build().err();
        assert!(matches!(err, Some(LLMError::InvalidRequest(_))));
    }

    #[test]
    fn build_without_key_fails() {
        let err = LLMBuilder::new().backend(LLMBackend::Google).build().err();
        assert!(matches!(err, Some(LLMError::InvalidRequest(msg)) if msg.contains("Google")));
    }

    #[test]
    fn build_google_with_key_succeeds() {
        let provider = LLMBuilder::new()
            .backend(LLMBackend::Google)
            .api_key("k")
            .model("gemini-1.5-flash")
            .temperature(0.0)
            .build();
        assert!(provider.is_ok());
    }
}
