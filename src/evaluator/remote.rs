use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::{error::EvalError, tracking::Example};

use super::criteria::EvaluatorSet;
use super::target::Target;
use super::types::SummaryRow;

/// In-flight target invocations allowed by default in a tracked experiment.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Parameters of a tracked experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentOptions {
    /// Prefix of the experiment name; the service appends a unique suffix.
    pub experiment_prefix: String,
    pub description: String,
    /// Reference dataset the experiment is linked to.
    pub dataset_id: String,
    pub max_concurrency: usize,
}

impl ExperimentOptions {
    /// Options for evaluating the assistant running on `model`.
    pub fn for_model(model: &str, dataset_id: impl Into<String>) -> Self {
        Self {
            experiment_prefix: format!("BookNook-{model}"),
            description: format!(
                "Book Nook - multi-criteria eval (similarity, correctness, helpfulness, containment) on {model}"
            ),
            dataset_id: dataset_id.into(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Outcome of a tracked experiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentResults {
    pub experiment_name: String,
    /// One row per example, in input order.
    pub rows: Vec<SummaryRow>,
    /// Where the experiment can be browsed, when the service exposes it.
    pub results_url: Option<String>,
}

/// An experiment-tracking backend able to run and record an evaluation.
#[async_trait]
pub trait ExperimentService: Send + Sync {
    async fn evaluate(
        &self,
        target: &dyn Target,
        evaluators: &EvaluatorSet,
        examples: &[Example],
        options: &ExperimentOptions,
    ) -> Result<ExperimentResults, EvalError>;
}

/// Hands an evaluation to an [`ExperimentService`] for traceability.
#[derive(Clone)]
pub struct RemoteExperimentRunner {
    service: Arc<dyn ExperimentService>,
}

impl RemoteExperimentRunner {
    pub fn new(service: Arc<dyn ExperimentService>) -> Self {
        Self { service }
    }

    pub async fn run(
        &self,
        target: &dyn Target,
        evaluators: &EvaluatorSet,
        examples: &[Example],
        options: &ExperimentOptions,
    ) -> Result<ExperimentResults, EvalError> {
        let mut options = options.clone();
        options.max_concurrency = options.max_concurrency.max(1);
        log::info!(
            "starting experiment {} over {} example(s), concurrency {}",
            options.experiment_prefix,
            examples.len(),
            options.max_concurrency
        );
        let results = self
            .service
            .evaluate(target, evaluators, examples, &options)
            .await?;
        log::info!("experiment {} finished", results.experiment_name);
        Ok(results)
    }
}
