//! LangSmith REST client: dataset examples, tracer sessions, runs and feedback.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::{stream, StreamExt, TryStreamExt};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::{EvalError, LLMError},
    evaluator::{
        EvaluationResult, EvaluatorSet, ExperimentOptions, ExperimentResults, ExperimentService,
        SummaryRow, Target,
    },
};

use super::dataset::DatasetClient;
use super::example::{Example, ExampleRecord, NewExample, INPUT_KEY, OUTPUT_KEY};

pub const DEFAULT_ENDPOINT: &str = "https://api.smith.langchain.com";
const PAGE_SIZE: usize = 100;
const RUN_NAME: &str = "Target Function";

/// Client for the LangSmith API.
#[derive(Clone)]
pub struct LangSmithClient {
    client: Client,
    base_url: Url,
    api_key: SecretString,
    timeout_seconds: Option<u64>,
}

impl std::fmt::Debug for LangSmithClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangSmithClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_seconds", &self.timeout_seconds)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct ExampleCreate<'a> {
    dataset_id: &'a str,
    inputs: Value,
    outputs: Value,
}

#[derive(Serialize)]
struct SessionCreate<'a> {
    id: Uuid,
    name: &'a str,
    description: &'a str,
    reference_dataset_id: &'a str,
    start_time: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
struct TracerSession {
    id: String,
    #[serde(default)]
    tenant_id: Option<String>,
}

#[derive(Serialize)]
struct RunCreate<'a> {
    id: Uuid,
    trace_id: Uuid,
    dotted_order: String,
    name: &'a str,
    run_type: &'a str,
    inputs: Value,
    outputs: Value,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    session_id: &'a str,
    reference_example_id: &'a str,
}

#[derive(Serialize)]
struct FeedbackCreate<'a> {
    id: Uuid,
    run_id: Uuid,
    key: &'a str,
    score: u8,
}

impl LangSmithClient {
    /// Creates a client for `endpoint`, or the public API when `None`.
    pub fn new(api_key: SecretString, endpoint: Option<String>) -> Result<Self, LLMError> {
        Self::with_client(Client::new(), api_key, endpoint)
    }

    pub fn with_client(
        client: Client,
        api_key: SecretString,
        endpoint: Option<String>,
    ) -> Result<Self, LLMError> {
        let raw = endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        let normalized = format!("{}/", raw.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| LLMError::InvalidRequest(format!("invalid LangSmith endpoint {raw}: {e}")))?;
        Ok(Self {
            client,
            base_url,
            api_key,
            timeout_seconds: None,
        })
    }

    pub fn timeout_seconds(mut self, timeout_seconds: Option<u64>) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    fn url(&self, path: &str) -> Result<Url, LLMError> {
        self.base_url
            .join(&format!("api/v1/{path}"))
            .map_err(|e| LLMError::InvalidRequest(format!("invalid API path {path}: {e}")))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, LLMError> {
        let mut request = request.header("x-api-key", self.api_key.expose_secret());
        if let Some(timeout) = self.timeout_seconds {
            request = request.timeout(Duration::from_secs(timeout));
        }
        let resp = request.send().await?;
        let status = resp.status();
        log::debug!("LangSmith {} -> {status}", resp.url().path());
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                LLMError::AuthError(format!("LangSmith rejected the API key ({status}): {body}"))
            }
            _ => LLMError::ProviderError(format!("LangSmith returned {status}: {body}")),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, LLMError> {
        let raw = self.send(request).await?.text().await?;
        serde_json::from_str(&raw).map_err(|e| LLMError::ResponseFormatError {
            message: format!("Failed to decode LangSmith response: {e}"),
            raw_response: raw,
        })
    }

    async fn create_session(
        &self,
        name: &str,
        options: &ExperimentOptions,
    ) -> Result<TracerSession, LLMError> {
        let body = SessionCreate {
            id: Uuid::new_v4(),
            name,
            description: &options.description,
            reference_dataset_id: &options.dataset_id,
            start_time: Utc::now(),
        };
        let session: TracerSession = self
            .send_json(self.client.post(self.url("sessions")?).json(&body))
            .await?;
        log::info!("created experiment {name} ({})", session.id);
        Ok(session)
    }

    async fn close_session(&self, session_id: &str) -> Result<(), LLMError> {
        let url = self.url(&format!("sessions/{session_id}"))?;
        self.send(self.client.patch(url).json(&json!({ "end_time": Utc::now() })))
            .await?;
        Ok(())
    }

    async fn record_run(
        &self,
        run_id: Uuid,
        example: &Example,
        response: &str,
        session_id: &str,
        (start_time, end_time): (DateTime<Utc>, DateTime<Utc>),
    ) -> Result<(), LLMError> {
        let body = RunCreate {
            id: run_id,
            trace_id: run_id,
            dotted_order: format!("{}{run_id}", start_time.format("%Y%m%dT%H%M%S%6fZ")),
            name: RUN_NAME,
            run_type: "chain",
            inputs: json!({ INPUT_KEY: example.question }),
            outputs: json!({ OUTPUT_KEY: response }),
            start_time,
            end_time,
            session_id,
            reference_example_id: &example.id,
        };
        self.send(self.client.post(self.url("runs")?).json(&body))
            .await?;
        Ok(())
    }

    async fn record_feedback(&self, run_id: Uuid, result: &EvaluationResult) -> Result<(), LLMError> {
        let body = FeedbackCreate {
            id: Uuid::new_v4(),
            run_id,
            key: result.key(),
            score: result.score,
        };
        self.send(self.client.post(self.url("feedback")?).json(&body))
            .await?;
        Ok(())
    }

    async fn evaluate_example(
        &self,
        idx: usize,
        example: &Example,
        target: &dyn Target,
        evaluators: &EvaluatorSet,
        session_id: &str,
    ) -> Result<(usize, SummaryRow), EvalError> {
        let start_time = Utc::now();
        let response = target
            .invoke(&example.question)
            .await
            .map_err(|source| EvalError::Target {
                question: example.question.clone(),
                source,
            })?;
        let end_time = Utc::now();

        let results = evaluators
            .evaluate_all(&example.question, &example.reference_answer, &response)
            .await?;

        let run_id = Uuid::new_v4();
        self.record_run(run_id, example, &response, session_id, (start_time, end_time))
            .await
            .map_err(EvalError::Tracking)?;
        for result in &results {
            self.record_feedback(run_id, result)
                .await
                .map_err(EvalError::Tracking)?;
        }

        Ok((
            idx,
            SummaryRow::from_results(example.question.clone(), response, &results),
        ))
    }

    /// Web address of the experiment comparison page. The UI lives on the
    /// API host without its `api.` label.
    fn results_url(&self, session: &TracerSession, dataset_id: &str) -> Option<String> {
        let tenant_id = session.tenant_id.as_deref()?;
        let mut web = self.base_url.clone();
        let web_host = web
            .host_str()
            .and_then(|h| h.strip_prefix("api."))
            .map(str::to_string);
        if let Some(host) = web_host {
            web.set_host(Some(&host)).ok()?;
        }
        let root = web.as_str().trim_end_matches('/').trim_end_matches("/api");
        Some(format!(
            "{root}/o/{tenant_id}/datasets/{dataset_id}/compare?selectedSessions={}",
            session.id
        ))
    }
}

#[async_trait]
impl DatasetClient for LangSmithClient {
    async fn list_examples(&self, dataset_id: &str) -> Result<Vec<Example>, LLMError> {
        let mut examples = Vec::new();
        loop {
            let mut url = self.url("examples")?;
            url.query_pairs_mut()
                .append_pair("dataset", dataset_id)
                .append_pair("offset", &examples.len().to_string())
                .append_pair("limit", &PAGE_SIZE.to_string());
            let page: Vec<ExampleRecord> = self.send_json(self.client.get(url)).await?;
            let fetched = page.len();
            examples.extend(page.into_iter().map(Example::from));
            if fetched < PAGE_SIZE {
                break;
            }
        }
        log::debug!("fetched {} example(s) from dataset {dataset_id}", examples.len());
        Ok(examples)
    }

    async fn create_examples(&self, dataset_id: &str, examples: &[NewExample]) -> Result<(), LLMError> {
        let body: Vec<ExampleCreate<'_>> = examples
            .iter()
            .map(|example| ExampleCreate {
                dataset_id,
                inputs: example.inputs(),
                outputs: example.outputs(),
            })
            .collect();
        self.send(self.client.post(self.url("examples/bulk")?).json(&body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ExperimentService for LangSmithClient {
    async fn evaluate(
        &self,
        target: &dyn Target,
        evaluators: &EvaluatorSet,
        examples: &[Example],
        options: &ExperimentOptions,
    ) -> Result<ExperimentResults, EvalError> {
        let suffix = Uuid::new_v4().simple().to_string();
        let experiment_name = format!("{}-{}", options.experiment_prefix, &suffix[..8]);
        let session = self
            .create_session(&experiment_name, options)
            .await
            .map_err(EvalError::Tracking)?;

        // Futures are built up front so the stream holds no borrowing closure.
        let pending: Vec<_> = examples
            .iter()
            .enumerate()
            .map(|(idx, example)| {
                self.evaluate_example(idx, example, target, evaluators, &session.id)
            })
            .collect();
        let mut rows: Vec<(usize, SummaryRow)> = stream::iter(pending)
            .buffer_unordered(options.max_concurrency.max(1))
            .try_collect()
            .await?;
        rows.sort_by_key(|(idx, _)| *idx);

        self.close_session(&session.id)
            .await
            .map_err(EvalError::Tracking)?;

        Ok(ExperimentResults {
            experiment_name,
            rows: rows.into_iter().map(|(_, row)| row).collect(),
            results_url: self.results_url(&session, &options.dataset_id),
        })
    }
}

#[cfg(test)]
#[path = "langsmith/tests.rs"]
mod tests;
