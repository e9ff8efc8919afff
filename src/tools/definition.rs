use serde_json::Value;
use std::sync::Arc;

use crate::builder::{FunctionBuilder, ParamBuilder};
use crate::chat::Tool;

use super::error::ToolError;

pub type ToolExecutor = Arc<dyn Fn(&Value) -> Result<String, ToolError> + Send + Sync>;

#[derive(Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: Vec<ToolParam>,
    pub required: Vec<&'static str>,
    pub executor: ToolExecutor,
}

#[derive(Clone)]
pub struct ToolParam {
    pub name: &'static str,
    pub description: &'static str,
    pub param_type: &'static str,
}

impl ToolParam {
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            param_type: "string",
        }
    }
}

impl ToolDefinition {
    pub fn function_builder(&self) -> FunctionBuilder {
        let builder = self
            .params
            .iter()
            .fold(
                FunctionBuilder::new(self.name).description(self.description),
                |builder, param| {
                    builder.param(
                        ParamBuilder::new(param.name)
                            .description(param.description)
                            .type_of(param.param_type),
                    )
                },
            );
        builder.required(self.required.iter().map(|name| name.to_string()).collect())
    }

    /// The schema sent to the model for this tool.
    pub fn to_tool(&self) -> Tool {
        self.function_builder().build()
    }
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}
