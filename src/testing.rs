//! Scripted chat providers shared by unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Tool},
    error::LLMError,
    FunctionCall, ToolCall,
};

#[derive(Debug, Clone)]
pub(crate) struct ScriptedResponse {
    pub(crate) text: Option<String>,
    pub(crate) calls: Vec<ToolCall>,
}

impl ScriptedResponse {
    pub(crate) fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: Vec::new(),
        }
    }

    pub(crate) fn call(name: &str, args: serde_json::Value) -> Self {
        Self {
            text: None,
            calls: vec![ToolCall {
                id: format!("call_{name}"),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: args.to_string(),
                },
            }],
        }
    }
}

impl std::fmt::Display for ScriptedResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text.as_deref().unwrap_or_default())
    }
}

impl ChatResponse for ScriptedResponse {
    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        (!self.calls.is_empty()).then(|| self.calls.clone())
    }
}

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedProvider {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
    tool_counts: Mutex<Vec<usize>>,
}

impl ScriptedProvider {
    pub(crate) fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    pub(crate) fn texts(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| ScriptedResponse::text(t)).collect())
    }

    pub(crate) fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub(crate) fn tool_counts(&self) -> Vec<usize> {
        self.tool_counts.lock().expect("tool counts lock").clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(messages.to_vec());
        self.tool_counts
            .lock()
            .expect("tool counts lock")
            .push(tools.map(<[Tool]>::len).unwrap_or(0));
        let next = self.responses.lock().expect("responses lock").pop_front();
        match next {
            Some(response) => Ok(Box::new(response)),
            None => Err(LLMError::ProviderError("script exhausted".to_string())),
        }
    }
}

/// Answers every request with the same text.
pub(crate) struct EchoProvider(pub(crate) &'static str);

#[async_trait]
impl ChatProvider for EchoProvider {
    async fn chat_with_tools(
        &self,
        _messages: &[ChatMessage],
        _tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        Ok(Box::new(crate::chat::TextResponse {
            text: self.0.to_string(),
        }))
    }
}
