use async_trait::async_trait;

use crate::error::LLMError;

use super::example::{Example, NewExample};

/// Storage backend for evaluation examples.
#[async_trait]
pub trait DatasetClient: Send + Sync {
    /// Every example in the dataset, in the order the backend returns them.
    async fn list_examples(&self, dataset_id: &str) -> Result<Vec<Example>, LLMError>;

    /// Appends `examples` to the dataset in one batch.
    async fn create_examples(&self, dataset_id: &str, examples: &[NewExample]) -> Result<(), LLMError>;
}
