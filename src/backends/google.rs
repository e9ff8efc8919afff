//! Google Gemini API client implementation for chat with function calling.
//!
//! Talks to the `generateContent` endpoint. System messages in the
//! conversation are folded into `systemInstruction`, tool uses become
//! `functionCall` parts and tool results become `functionResponse` parts.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole, MessageType, Tool, Usage},
    error::LLMError,
    FunctionCall, ToolCall,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for the Google client.
#[derive(Debug)]
pub struct GoogleConfig {
    /// API key for authentication with Google.
    pub api_key: String,
    /// Base URL of the Generative Language API.
    pub base_url: Url,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate in responses.
    pub max_tokens: Option<u32>,
    /// Sampling temperature for response randomness.
    pub temperature: Option<f32>,
    /// System prompt to guide model behavior.
    pub system: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// Client for interacting with Google's Gemini API.
///
/// The client uses `Arc` internally for configuration, making cloning cheap.
#[derive(Debug, Clone)]
pub struct Google {
    /// Shared configuration wrapped in Arc for cheap cloning.
    pub config: Arc<GoogleConfig>,
    /// HTTP client for making requests.
    pub client: Client,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GoogleChatRequest<'a> {
    contents: Vec<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GoogleContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GoogleGenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<GoogleTool<'a>>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct GoogleContent {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GooglePart>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GooglePart {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    function_call: Option<GoogleFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    function_response: Option<GoogleFunctionResponse>,
}

#[derive(Serialize, Deserialize, Debug)]
struct GoogleFunctionCall {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Serialize, Deserialize, Debug)]
struct GoogleFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GoogleTool<'a> {
    function_declarations: Vec<GoogleFunctionDeclaration<'a>>,
}

#[derive(Serialize, Debug)]
struct GoogleFunctionDeclaration<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

/// Response body of `generateContent`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GoogleChatResponse {
    #[serde(default)]
    candidates: Vec<GoogleCandidate>,
    #[serde(default)]
    usage_metadata: Option<Usage>,
}

#[derive(Deserialize, Debug)]
struct GoogleCandidate {
    #[serde(default)]
    content: GoogleContent,
}

impl GoogleChatResponse {
    fn parts(&self) -> &[GooglePart] {
        self.candidates
            .first()
            .map(|c| c.content.parts.as_slice())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for GoogleChatResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.text() {
            Some(text) => write!(f, "{text}"),
            None => write!(f, "{self:?}"),
        }
    }
}

impl ChatResponse for GoogleChatResponse {
    fn text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn tool_calls(&self) -> Option<Vec<ToolCall>> {
        let calls: Vec<ToolCall> = self
            .parts()
            .iter()
            .filter_map(|part| part.function_call.as_ref())
            .enumerate()
            .map(|(idx, call)| ToolCall {
                id: call
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("call_{idx}_{}", uuid::Uuid::new_v4().simple())),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: call.name.clone(),
                    arguments: call.args.to_string(),
                },
            })
            .collect();
        if calls.is_empty() {
            None
        } else {
            Some(calls)
        }
    }

    fn usage(&self) -> Option<Usage> {
        self.usage_metadata.clone()
    }
}

impl Google {
    /// Creates a new Google client against the public endpoint.
    pub fn new(
        api_key: impl Into<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Result<Self, LLMError> {
        Self::with_base_url(
            Client::new(),
            None,
            api_key,
            model,
            max_tokens,
            temperature,
            timeout_seconds,
            system,
        )
    }

    /// Creates a new Google client with a custom HTTP client and base URL.
    #[allow(clippy::too_many_arguments)]
    pub fn with_base_url(
        client: Client,
        base_url: Option<String>,
        api_key: impl Into<String>,
        model: Option<String>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
        timeout_seconds: Option<u64>,
        system: Option<String>,
    ) -> Result<Self, LLMError> {
        let base_url = parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        Ok(Self {
            config: Arc::new(GoogleConfig {
                api_key: api_key.into(),
                base_url,
                model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens,
                temperature,
                system,
                timeout_seconds,
            }),
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> Result<Url, LLMError> {
        let path = format!("models/{}:generateContent", self.config.model);
        self.config
            .base_url
            .join(&path)
            .map_err(|e| LLMError::InvalidRequest(format!("invalid model path {path}: {e}")))
    }

    fn build_request<'a>(
        &self,
        messages: &[ChatMessage],
        tools: Option<&'a [Tool]>,
    ) -> Result<GoogleChatRequest<'a>, LLMError> {
        let mut system_texts: Vec<String> = self.config.system.iter().cloned().collect();
        let mut contents = Vec::with_capacity(messages.len());
        for msg in messages {
            if msg.role == ChatRole::System {
                system_texts.push(msg.content.clone());
                continue;
            }
            if let Some(content) = convert_message(msg)? {
                contents.push(content);
            }
        }

        let system_instruction = (!system_texts.is_empty()).then(|| GoogleContent {
            role: None,
            parts: vec![text_part(system_texts.join("\n\n"))],
        });

        let generation_config = (self.config.temperature.is_some()
            || self.config.max_tokens.is_some())
        .then(|| GoogleGenerationConfig {
            temperature: self.config.temperature,
            max_output_tokens: self.config.max_tokens,
        });

        let tools = match tools {
            Some(tools) if !tools.is_empty() => vec![GoogleTool {
                function_declarations: tools
                    .iter()
                    .map(|tool| GoogleFunctionDeclaration {
                        name: &tool.function.name,
                        description: &tool.function.description,
                        parameters: &tool.function.parameters,
                    })
                    .collect(),
            }],
            _ => Vec::new(),
        };

        Ok(GoogleChatRequest {
            contents,
            system_instruction,
            generation_config,
            tools,
        })
    }
}

#[async_trait]
impl ChatProvider for Google {
    async fn chat_with_tools(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<Box<dyn ChatResponse>, LLMError> {
        if self.config.api_key.is_empty() {
            return Err(LLMError::AuthError("Missing Google API key".to_string()));
        }

        let body = self.build_request(messages, tools)?;

        if log::log_enabled!(log::Level::Trace) {
            if let Ok(json) = serde_json::to_string(&body) {
                log::trace!("Google request payload: {}", json);
            }
        }

        let mut request = self
            .client
            .post(self.endpoint()?)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body);

        if let Some(timeout) = self.config.timeout_seconds {
            request = request.timeout(std::time::Duration::from_secs(timeout));
        }

        let resp = request.send().await?;

        log::debug!("Google HTTP status: {}", resp.status());

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(LLMError::ResponseFormatError {
                message: format!("Google API returned error status: {status}"),
                raw_response: error_text,
            });
        }

        let raw = resp.text().await?;
        let json_resp: GoogleChatResponse =
            serde_json::from_str(&raw).map_err(|e| LLMError::ResponseFormatError {
                message: format!("Failed to decode Google API response: {e}"),
                raw_response: raw.clone(),
            })?;

        Ok(Box::new(json_resp))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, LLMError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&normalized).map_err(|e| LLMError::InvalidRequest(format!("invalid base URL: {e}")))
}

fn text_part(text: impl Into<String>) -> GooglePart {
    GooglePart {
        text: Some(text.into()),
        ..Default::default()
    }
}

fn convert_message(msg: &ChatMessage) -> Result<Option<GoogleContent>, LLMError> {
    let role = match (msg.role, &msg.message_type) {
        (_, MessageType::ToolResult(_)) => "user",
        (ChatRole::Assistant, _) => "model",
        (ChatRole::User | ChatRole::System, _) => "user",
    };
    let parts = match &msg.message_type {
        MessageType::Text if msg.content.is_empty() => return Ok(None),
        MessageType::Text => vec![text_part(msg.content.clone())],
        MessageType::ToolUse(calls) => calls
            .iter()
            .map(|call| {
                Ok(GooglePart {
                    function_call: Some(GoogleFunctionCall {
                        id: None,
                        name: call.function.name.clone(),
                        args: parse_arguments(&call.function.arguments)?,
                    }),
                    ..Default::default()
                })
            })
            .collect::<Result<Vec<_>, LLMError>>()?,
        MessageType::ToolResult(results) => results
            .iter()
            .map(|result| GooglePart {
                function_response: Some(GoogleFunctionResponse {
                    name: result.function.name.clone(),
                    response: serde_json::json!({ "content": result.function.arguments }),
                }),
                ..Default::default()
            })
            .collect(),
    };
    Ok(Some(GoogleContent {
        role: Some(role.to_string()),
        parts,
    }))
}

fn parse_arguments(raw: &str) -> Result<Value, LLMError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    Ok(serde_json::from_str(raw)?)
}
