#[path = "agent/assistant.rs"]
mod assistant;

pub use assistant::{ensure_system_prompt, final_answer, Assistant, DEFAULT_MAX_STEPS};
