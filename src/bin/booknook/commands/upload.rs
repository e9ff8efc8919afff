use anyhow::Context;

use booknook::{
    config::AppConfig,
    tracking::{seed_examples, DatasetClient},
};

use crate::runtime;

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let dataset_id = config.require_dataset_id()?;
    let client = runtime::langsmith_client(config)?;
    let examples = seed_examples();

    println!(
        "Uploading {} examples to LangSmith Dataset ID: {dataset_id}",
        examples.len()
    );
    client
        .create_examples(dataset_id, &examples)
        .await
        .context("failed to upload examples")?;
    println!("Examples uploaded successfully!");
    Ok(())
}
