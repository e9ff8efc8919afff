use serde::{Deserialize, Serialize};

/// Usage metadata for a chat response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the prompt
    #[serde(alias = "promptTokenCount", default)]
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    #[serde(alias = "candidatesTokenCount", default)]
    pub completion_tokens: u32,
    /// Total number of tokens used
    #[serde(alias = "totalTokenCount", default)]
    pub total_tokens: u32,
}
