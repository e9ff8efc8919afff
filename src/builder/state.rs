use secrecy::SecretString;

use super::backend::LLMBackend;

#[derive(Default)]
pub(crate) struct BuilderState {
    pub(crate) backend: Option<LLMBackend>,
    pub(crate) api_key: Option<SecretString>,
    pub(crate) base_url: Option<String>,
    pub(crate) model: Option<String>,
    pub(crate) max_tokens: Option<u32>,
    pub(crate) temperature: Option<f32>,
    pub(crate) timeout_seconds: Option<u64>,
}
