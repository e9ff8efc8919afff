use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One scoring axis. Declaration order is the fixed evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criterion {
    Similarity,
    Correctness,
    Helpfulness,
    Containment,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Similarity,
        Criterion::Correctness,
        Criterion::Helpfulness,
        Criterion::Containment,
    ];

    /// Stable key used in reports and feedback records.
    pub fn key(self) -> &'static str {
        match self {
            Criterion::Similarity => "similarity",
            Criterion::Correctness => "correctness",
            Criterion::Helpfulness => "helpfulness",
            Criterion::Containment => "containment",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Score produced by one evaluator for one example.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    #[serde(rename = "key")]
    pub criterion: Criterion,
    /// Always within `[MIN_SCORE, MAX_SCORE]`
    pub score: u8,
}

impl EvaluationResult {
    pub fn new(criterion: Criterion, score: u8) -> Self {
        Self { criterion, score }
    }

    pub fn key(&self) -> &'static str {
        self.criterion.key()
    }
}

/// Per-example view of a run. Criteria without a result read as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub question: String,
    pub response: String,
    pub similarity: u8,
    pub correctness: u8,
    pub helpfulness: u8,
    pub containment: u8,
}

impl SummaryRow {
    pub fn from_results(
        question: impl Into<String>,
        response: impl Into<String>,
        results: &[EvaluationResult],
    ) -> Self {
        let score = |criterion: Criterion| {
            results
                .iter()
                .rev()
                .find(|r| r.criterion == criterion)
                .map(|r| r.score)
                .unwrap_or(0)
        };
        Self {
            question: question.into(),
            response: response.into(),
            similarity: score(Criterion::Similarity),
            correctness: score(Criterion::Correctness),
            helpfulness: score(Criterion::Helpfulness),
            containment: score(Criterion::Containment),
        }
    }

    pub fn score(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::Similarity => self.similarity,
            Criterion::Correctness => self.correctness,
            Criterion::Helpfulness => self.helpfulness,
            Criterion::Containment => self.containment,
        }
    }
}

/// Arithmetic mean per criterion. Every criterion is present; a criterion
/// with no scores has mean 0.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Means(BTreeMap<Criterion, f64>);

impl Means {
    pub fn from_scores(scores: &BTreeMap<Criterion, Vec<u8>>) -> Self {
        let means = Criterion::ALL
            .iter()
            .map(|&criterion| {
                let values = scores.get(&criterion).map(Vec::as_slice).unwrap_or_default();
                (criterion, mean(values))
            })
            .collect();
        Self(means)
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0.get(&criterion).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, f64)> + '_ {
        self.0.iter().map(|(c, m)| (*c, *m))
    }
}

fn mean(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64
}
