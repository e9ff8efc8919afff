use std::sync::Arc;

use anyhow::Context;

use booknook::{
    config::AppConfig,
    evaluator::{
        format_means, format_rows, summarize, EvaluatorSet, ExperimentOptions, JudgeScorer,
        RemoteExperimentRunner, TargetInvoker,
    },
    tracking::DatasetClient,
};

use crate::runtime;

pub async fn run(config: &AppConfig, local_only: bool) -> anyhow::Result<()> {
    let dataset_id = config.require_dataset_id()?;
    let provider = runtime::gemini_provider(config)?;
    let client = runtime::langsmith_client(config)?;

    let target = TargetInvoker::new(runtime::assistant(Arc::clone(&provider)));
    let evaluators = EvaluatorSet::standard(JudgeScorer::new(provider));

    let examples = client
        .list_examples(dataset_id)
        .await
        .with_context(|| format!("failed to list examples of dataset {dataset_id}"))?;
    log::info!("evaluating {} example(s) from {dataset_id}", examples.len());

    let (means, rows) = summarize(&target, &evaluators, &examples)
        .await
        .context("local evaluation failed")?;
    println!("\n=== Local Evaluation Summary (Immediate) ===");
    print!("{}", format_means(&means));
    print!("{}", format_rows(&rows));

    if local_only {
        return Ok(());
    }

    let mut options = ExperimentOptions::for_model(&config.gemini.model, dataset_id);
    options.max_concurrency = config.langsmith.max_concurrency;
    let runner = RemoteExperimentRunner::new(Arc::new(client));
    let results = runner
        .run(&target, &evaluators, &examples, &options)
        .await
        .context("tracked experiment failed")?;
    if let Some(url) = results.results_url {
        println!("\nView the LangSmith evaluation results at:");
        println!("{url}");
    } else {
        println!("\nExperiment {} recorded.", results.experiment_name);
    }
    Ok(())
}
