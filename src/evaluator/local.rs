use std::collections::BTreeMap;

use crate::{error::EvalError, tracking::Example};

use super::criteria::EvaluatorSet;
use super::target::Target;
use super::types::{Criterion, Means, SummaryRow};

/// Runs `target` and every evaluator over `examples`, one at a time and in
/// input order. The first failure aborts the whole run.
pub async fn summarize(
    target: &dyn Target,
    evaluators: &EvaluatorSet,
    examples: &[Example],
) -> Result<(Means, Vec<SummaryRow>), EvalError> {
    let mut scores: BTreeMap<Criterion, Vec<u8>> = BTreeMap::new();
    let mut rows = Vec::with_capacity(examples.len());

    for (idx, example) in examples.iter().enumerate() {
        log::debug!("evaluating example {}/{} ({})", idx + 1, examples.len(), example.id);
        let response = target
            .invoke(&example.question)
            .await
            .map_err(|source| EvalError::Target {
                question: example.question.clone(),
                source,
            })?;
        let results = evaluators
            .evaluate_all(&example.question, &example.reference_answer, &response)
            .await?;
        for result in &results {
            scores.entry(result.criterion).or_default().push(result.score);
        }
        rows.push(SummaryRow::from_results(
            example.question.clone(),
            response,
            &results,
        ));
    }

    Ok((Means::from_scores(&scores), rows))
}
