#[path = "evaluator/types.rs"]
mod types;

#[path = "evaluator/judge.rs"]
mod judge;

#[path = "evaluator/criteria.rs"]
mod criteria;

#[path = "evaluator/target.rs"]
mod target;

#[path = "evaluator/local.rs"]
mod local;

#[path = "evaluator/remote.rs"]
mod remote;

#[path = "evaluator/report.rs"]
mod report;

pub use criteria::{
    containment_score, ContainmentEvaluator, CorrectnessEvaluator, Evaluator, EvaluatorSet,
    HelpfulnessEvaluator, SimilarityEvaluator,
};
pub use judge::{parse_score, JudgeScorer, MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE};
pub use local::summarize;
pub use remote::{
    ExperimentOptions, ExperimentResults, ExperimentService, RemoteExperimentRunner,
    DEFAULT_MAX_CONCURRENCY,
};
pub use report::{format_means, format_rows};
pub use target::{Target, TargetInvoker};
pub use types::{Criterion, EvaluationResult, Means, SummaryRow};
