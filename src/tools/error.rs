#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    NotFound(String),
    #[error("invalid tool arguments: {0}")]
    InvalidArgs(String),
    #[error("missing required argument: {0}")]
    MissingArg(&'static str),
}
