/// Supported LLM backend providers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LLMBackend {
    #[default]
    Google,
}
