use async_trait::async_trait;

use crate::{
    agent::{final_answer, Assistant},
    error::LLMError,
};

/// The system under evaluation: maps a question to an answer.
#[async_trait]
pub trait Target: Send + Sync {
    async fn invoke(&self, question: &str) -> Result<String, LLMError>;
}

/// Runs one fresh assistant turn per question and keeps the final text.
#[derive(Clone)]
pub struct TargetInvoker {
    assistant: Assistant,
}

impl TargetInvoker {
    pub fn new(assistant: Assistant) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Target for TargetInvoker {
    async fn invoke(&self, question: &str) -> Result<String, LLMError> {
        let emitted = self.assistant.ask(question).await?;
        Ok(final_answer(&emitted))
    }
}
