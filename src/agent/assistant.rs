use std::sync::Arc;

use crate::{
    chat::{ChatMessage, ChatProvider, ChatRole, Tool},
    error::LLMError,
    prompts,
    tools::ToolRegistry,
    FunctionCall, ToolCall,
};

/// Model calls allowed in one turn before the loop is considered runaway.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// The Book Nook assistant: a chat provider plus the tools it may call.
#[derive(Clone)]
pub struct Assistant {
    provider: Arc<dyn ChatProvider>,
    registry: ToolRegistry,
    system_prompt: String,
    max_steps: usize,
}

impl Assistant {
    pub fn new(provider: Arc<dyn ChatProvider>, registry: ToolRegistry) -> Self {
        Self {
            provider,
            registry,
            system_prompt: prompts::system_message_text(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Replaces the system prompt injected into fresh conversations.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Runs one turn over `messages` and returns only the messages emitted
    /// during the turn: tool uses, tool results and the final answer.
    pub async fn run_turn(&self, messages: Vec<ChatMessage>) -> Result<Vec<ChatMessage>, LLMError> {
        let mut conversation = ensure_system_prompt(messages, &self.system_prompt);
        let start = conversation.len();
        let tools = self.registry.tools();
        let tools: Option<&[Tool]> = (!tools.is_empty()).then_some(tools.as_slice());

        for step in 0..self.max_steps {
            let response = self.provider.chat_with_tools(&conversation, tools).await?;
            let text = response.text().unwrap_or_default();
            let calls = response.tool_calls().unwrap_or_default();
            if calls.is_empty() {
                log::debug!("assistant answered after {} model call(s)", step + 1);
                conversation.push(ChatMessage::assistant().content(text).build());
                return Ok(conversation.split_off(start));
            }

            let results = self.execute_calls(&calls);
            conversation.push(ChatMessage::assistant().content(text).tool_use(calls).build());
            conversation.push(ChatMessage::assistant().tool_result(results).build());
        }

        Err(LLMError::StepLimitExceeded {
            limit: self.max_steps,
        })
    }

    /// Runs a single-question turn on a fresh conversation.
    pub async fn ask(&self, question: &str) -> Result<Vec<ChatMessage>, LLMError> {
        self.run_turn(vec![ChatMessage::user().content(question).build()])
            .await
    }

    fn execute_calls(&self, calls: &[ToolCall]) -> Vec<ToolCall> {
        calls
            .iter()
            .map(|call| {
                log::debug!(
                    "tool call {} {}({})",
                    call.id,
                    call.function.name,
                    call.function.arguments
                );
                let output = match self
                    .registry
                    .execute(&call.function.name, &call.function.arguments)
                {
                    Ok(output) => output,
                    Err(err) => {
                        log::warn!("tool {} failed: {err}", call.function.name);
                        format!("Tool error: {err}")
                    }
                };
                ToolCall {
                    id: call.id.clone(),
                    call_type: call.call_type.clone(),
                    function: FunctionCall {
                        name: call.function.name.clone(),
                        arguments: output,
                    },
                }
            })
            .collect()
    }
}

/// Prepends a system message unless the conversation already starts with one.
pub fn ensure_system_prompt(messages: Vec<ChatMessage>, system_prompt: &str) -> Vec<ChatMessage> {
    if messages.first().map(|m| m.role) == Some(ChatRole::System) {
        return messages;
    }
    let mut with_system = Vec::with_capacity(messages.len() + 1);
    with_system.push(ChatMessage::system().content(system_prompt).build());
    with_system.extend(messages);
    with_system
}

/// Text of the last assistant message that is not a tool invocation, or an
/// empty string when the turn produced none.
pub fn final_answer(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.is_assistant_text())
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
