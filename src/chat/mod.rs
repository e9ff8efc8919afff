mod message;
mod tool;
mod traits;
mod usage;

pub use message::{ChatMessage, ChatMessageBuilder, ChatRole, MessageType};
pub use tool::{FunctionTool, ParameterProperty, ParametersSchema, Tool};
pub use traits::{ChatProvider, ChatResponse, TextResponse};
pub use usage::Usage;
