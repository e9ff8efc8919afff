//! Book Nook: a literary assistant backed by an LLM, with mocked bookstore
//! tools and an evaluation harness that scores the assistant with an LLM judge.
//!
//! The crate is organised around the [`chat::ChatProvider`] seam. Everything
//! that talks to a model (the assistant, the judge) takes a provider as an
//! explicit dependency, so the whole pipeline runs against scripted providers
//! in tests.

use serde::{Deserialize, Serialize};

/// The assistant: system prompt injection and the tool-calling loop.
pub mod agent;
/// HTTP backends implementing [`chat::ChatProvider`].
pub mod backends;
/// Builder for constructing providers and tool definitions.
pub mod builder;
/// Chat message, tool and provider types.
pub mod chat;
/// Configuration loading from TOML, `.env` and the environment.
pub mod config;
/// Error types.
pub mod error;
/// Evaluation harness: judge, evaluators, target invoker and aggregators.
pub mod evaluator;
/// Prompt templates.
pub mod prompts;
/// Bookstore tools exposed to the assistant.
pub mod tools;
/// Dataset and experiment-tracking clients.
pub mod tracking;

#[cfg(test)]
mod testing;

/// A tool invocation requested by the model, or its result when echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier correlating a call with its result
    pub id: String,
    /// Always "function" for the tools in this crate
    #[serde(rename = "type")]
    pub call_type: String,
    /// Function name and JSON-encoded arguments
    pub function: FunctionCall,
}

/// Function name plus JSON-encoded arguments (or output, in a tool result).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}
