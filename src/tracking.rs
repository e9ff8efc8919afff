//! Dataset storage and experiment tracking.
//!
//! Examples live in a remote dataset keyed by an opaque id. The
//! [`LangSmithClient`] reads and writes them and records tracked
//! experiments through the [`crate::evaluator::ExperimentService`] seam.

#[path = "tracking/example.rs"]
mod example;

#[path = "tracking/dataset.rs"]
mod dataset;

#[path = "tracking/langsmith.rs"]
mod langsmith;

pub use dataset::DatasetClient;
pub use example::{seed_examples, Example, NewExample, INPUT_KEY, OUTPUT_KEY, REFERENCE_KEY};
pub use langsmith::{LangSmithClient, DEFAULT_ENDPOINT};
