#[path = "tools/definition.rs"]
mod definition;

#[path = "tools/error.rs"]
mod error;

#[path = "tools/registry.rs"]
mod registry;

#[path = "tools/bookstore.rs"]
mod bookstore;

pub use bookstore::{author_info, bookstore_tools, check_stock, escalate_to_human};
pub use definition::{ToolDefinition, ToolExecutor, ToolParam};
pub use error::ToolError;
pub use registry::ToolRegistry;
