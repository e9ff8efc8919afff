use thiserror::Error;

/// Error types that can occur when talking to the model or the tracking service.
#[derive(Debug, Error)]
pub enum LLMError {
    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// Authentication and authorization errors
    #[error("Auth error: {0}")]
    AuthError(String),
    /// Invalid request parameters or format
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Errors returned by the LLM provider
    #[error("Provider error: {0}")]
    ProviderError(String),
    /// API response parsing or format error
    #[error("Response format error: {message}. Raw response: {raw_response}")]
    ResponseFormatError {
        message: String,
        raw_response: String,
    },
    /// JSON serialization/deserialization errors
    #[error("JSON parse error: {0}")]
    JsonError(String),
    /// The assistant kept requesting tools past the step limit
    #[error("Assistant exceeded {limit} model calls without a final answer")]
    StepLimitExceeded { limit: usize },
}

/// Converts reqwest HTTP errors into LlmErrors
impl From<reqwest::Error> for LLMError {
    fn from(err: reqwest::Error) -> Self {
        LLMError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LLMError {
    fn from(err: serde_json::Error) -> Self {
        LLMError::JsonError(format!(
            "{} at line {} column {}",
            err,
            err.line(),
            err.column()
        ))
    }
}

/// Failure of one stage of an evaluation run. Any of these aborts the batch.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The assistant under test failed to answer
    #[error("target invocation failed for {question:?}: {source}")]
    Target {
        question: String,
        #[source]
        source: LLMError,
    },
    /// A judge call failed at the transport level
    #[error("{key} evaluator failed: {source}")]
    Evaluator {
        key: &'static str,
        #[source]
        source: LLMError,
    },
    /// The experiment-tracking service rejected a request
    #[error("tracking service error: {0}")]
    Tracking(#[source] LLMError),
}
