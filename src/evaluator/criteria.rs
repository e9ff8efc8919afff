use std::collections::HashSet;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::json;

use crate::{error::EvalError, error::LLMError, prompts};

use super::judge::{JudgeScorer, MAX_SCORE, MIN_SCORE};
use super::types::{Criterion, EvaluationResult};

/// Scores one produced answer against its question and reference.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn criterion(&self) -> Criterion;

    async fn evaluate(
        &self,
        input: &str,
        reference_output: &str,
        actual_output: &str,
    ) -> Result<EvaluationResult, LLMError>;
}

/// Judge-rated closeness of meaning between answer and reference.
pub struct SimilarityEvaluator {
    judge: JudgeScorer,
}

impl SimilarityEvaluator {
    pub fn new(judge: JudgeScorer) -> Self {
        Self { judge }
    }

    fn prompt(input: &str, reference_output: &str, actual_output: &str) -> String {
        format!(
            "You are a semantic similarity evaluator. Score 1–10 (10 = same meaning).\n\n\
             Question: {input}\nReference: {reference_output}\nResponse: {actual_output}\n\
             Return ONLY a number."
        )
    }
}

#[async_trait]
impl Evaluator for SimilarityEvaluator {
    fn criterion(&self) -> Criterion {
        Criterion::Similarity
    }

    async fn evaluate(
        &self,
        input: &str,
        reference_output: &str,
        actual_output: &str,
    ) -> Result<EvaluationResult, LLMError> {
        let prompt = Self::prompt(input, reference_output, actual_output);
        let score = self.judge.score(&prompt).await?;
        Ok(EvaluationResult::new(self.criterion(), score))
    }
}

/// Judge-rated factual correctness using the static rubric.
pub struct CorrectnessEvaluator {
    judge: JudgeScorer,
}

impl CorrectnessEvaluator {
    pub fn new(judge: JudgeScorer) -> Self {
        Self { judge }
    }

    /// The rubric sees the same payload maps the dataset stores.
    fn prompt(input: &str, reference_output: &str, actual_output: &str) -> String {
        let filled = prompts::fill_correctness_rubric(
            &json!({ "HUMAN": input }).to_string(),
            &json!({ "output": actual_output }).to_string(),
            &json!({ "AI": reference_output }).to_string(),
        );
        format!(
            "Read the following rubric-driven evaluation and return a single integer score 1–10.\n\n\
             {filled}\n\nReturn ONLY the number."
        )
    }
}

#[async_trait]
impl Evaluator for CorrectnessEvaluator {
    fn criterion(&self) -> Criterion {
        Criterion::Correctness
    }

    async fn evaluate(
        &self,
        input: &str,
        reference_output: &str,
        actual_output: &str,
    ) -> Result<EvaluationResult, LLMError> {
        let prompt = Self::prompt(input, reference_output, actual_output);
        let score = self.judge.score(&prompt).await?;
        Ok(EvaluationResult::new(self.criterion(), score))
    }
}

/// Judge-rated helpfulness. The reference answer is not consulted.
pub struct HelpfulnessEvaluator {
    judge: JudgeScorer,
}

impl HelpfulnessEvaluator {
    pub fn new(judge: JudgeScorer) -> Self {
        Self { judge }
    }

    fn prompt(input: &str, actual_output: &str) -> String {
        format!(
            "Evaluate HELPFULNESS on a scale 1–10 (10 = fully helpful, actionable, \
             addresses the request, minimal irrelevant content). Consider clarity and guidance.\n\n\
             Question: {input}\nResponse: {actual_output}\nReturn ONLY a number."
        )
    }
}

#[async_trait]
impl Evaluator for HelpfulnessEvaluator {
    fn criterion(&self) -> Criterion {
        Criterion::Helpfulness
    }

    async fn evaluate(
        &self,
        input: &str,
        _reference_output: &str,
        actual_output: &str,
    ) -> Result<EvaluationResult, LLMError> {
        let score = self.judge.score(&Self::prompt(input, actual_output)).await?;
        Ok(EvaluationResult::new(self.criterion(), score))
    }
}

/// Rule-based lexical overlap of the reference inside the answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainmentEvaluator;

#[async_trait]
impl Evaluator for ContainmentEvaluator {
    fn criterion(&self) -> Criterion {
        Criterion::Containment
    }

    async fn evaluate(
        &self,
        _input: &str,
        reference_output: &str,
        actual_output: &str,
    ) -> Result<EvaluationResult, LLMError> {
        Ok(EvaluationResult::new(
            self.criterion(),
            containment_score(reference_output, actual_output),
        ))
    }
}

/// Share of reference word tokens present in the response, scaled to 1–10.
///
/// Tokens are lower-cased `\w+` runs compared as sets. Halves round to even.
/// An empty reference, an empty response or a reference with no word
/// tokens scores [`MIN_SCORE`].
pub fn containment_score(reference: &str, response: &str) -> u8 {
    let reference = reference.trim().to_lowercase();
    let response = response.trim().to_lowercase();
    if reference.is_empty() || response.is_empty() {
        return MIN_SCORE;
    }
    let reference_tokens = word_tokens(&reference);
    if reference_tokens.is_empty() {
        return MIN_SCORE;
    }
    let response_tokens = word_tokens(&response);
    let shared = reference_tokens.intersection(&response_tokens).count();
    let overlap = shared as f64 / reference_tokens.len() as f64;
    let scaled = (overlap * 10.0).round_ties_even() as u8;
    scaled.clamp(MIN_SCORE, MAX_SCORE)
}

fn word_tokens(text: &str) -> HashSet<&str> {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let re = WORD.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"));
    re.find_iter(text).map(|m| m.as_str()).collect()
}

/// The evaluators run against every example, in evaluation order.
pub struct EvaluatorSet {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl EvaluatorSet {
    pub fn new(evaluators: Vec<Box<dyn Evaluator>>) -> Self {
        Self { evaluators }
    }

    /// Similarity, correctness, helpfulness and containment, sharing one judge.
    pub fn standard(judge: JudgeScorer) -> Self {
        Self::new(vec![
            Box::new(SimilarityEvaluator::new(judge.clone())),
            Box::new(CorrectnessEvaluator::new(judge.clone())),
            Box::new(HelpfulnessEvaluator::new(judge)),
            Box::new(ContainmentEvaluator),
        ])
    }

    pub fn criteria(&self) -> Vec<Criterion> {
        self.evaluators.iter().map(|e| e.criterion()).collect()
    }

    /// Runs every evaluator in order; the first failure aborts.
    pub async fn evaluate_all(
        &self,
        input: &str,
        reference_output: &str,
        actual_output: &str,
    ) -> Result<Vec<EvaluationResult>, EvalError> {
        let mut results = Vec::with_capacity(self.evaluators.len());
        for evaluator in &self.evaluators {
            let result = evaluator
                .evaluate(input, reference_output, actual_output)
                .await
                .map_err(|source| EvalError::Evaluator {
                    key: evaluator.criterion().key(),
                    source,
                })?;
            results.push(result);
        }
        Ok(results)
    }
}
