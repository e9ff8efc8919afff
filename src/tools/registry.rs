use serde_json::Value;

use crate::chat::Tool;

use super::bookstore::bookstore_tools;
use super::definition::ToolDefinition;
use super::error::ToolError;

/// Named tools the assistant may call, dispatched by function name.
#[derive(Clone, Debug)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(bookstore_tools())
    }
}

impl ToolRegistry {
    pub fn new(tools: Vec<ToolDefinition>) -> Self {
        Self { tools }
    }

    /// A registry with no tools; the model can only answer in text.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name).collect()
    }

    /// Tool schemas in registration order.
    pub fn tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDefinition::to_tool).collect()
    }

    pub fn execute(&self, name: &str, args_json: &str) -> Result<String, ToolError> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name == name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        let args = parse_args(args_json)?;
        for required in &tool.required {
            if args.get(required).is_none() {
                return Err(ToolError::MissingArg(*required));
            }
        }
        (tool.executor)(&args)
    }
}

fn parse_args(raw: &str) -> Result<Value, ToolError> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw).map_err(|err| ToolError::InvalidArgs(err.to_string()))
}
