use std::sync::Arc;

use mockito::Matcher;
use serde_json::json;

use super::*;
use crate::evaluator::{Criterion, JudgeScorer};
use crate::testing::EchoProvider;

fn client_for(url: &str) -> LangSmithClient {
    LangSmithClient::new(SecretString::new("ls-key".to_string()), Some(url.to_string())).unwrap()
}

fn examples_path() -> Matcher {
    Matcher::Regex(r"^/api/v1/examples".to_string())
}

fn record(idx: usize) -> Value {
    json!({
        "id": format!("ex-{idx}"),
        "inputs": {"HUMAN": format!("question {idx}")},
        "outputs": {"AI": format!("answer {idx}")}
    })
}

struct Upper;

#[async_trait]
impl Target for Upper {
    async fn invoke(&self, question: &str) -> Result<String, LLMError> {
        Ok(question.to_uppercase())
    }
}

#[tokio::test]
async fn list_examples_pages_until_short_page() {
    let mut server = mockito::Server::new_async().await;
    let first: Vec<Value> = (0..PAGE_SIZE).map(record).collect();
    let first_page = server
        .mock("GET", examples_path())
        .match_header("x-api-key", "ls-key")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("dataset".into(), "ds-1".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
            Matcher::UrlEncoded("limit".into(), PAGE_SIZE.to_string()),
        ]))
        .with_status(200)
        .with_body(Value::Array(first).to_string())
        .create_async()
        .await;
    let second_page = server
        .mock("GET", examples_path())
        .match_query(Matcher::UrlEncoded("offset".into(), PAGE_SIZE.to_string()))
        .with_status(200)
        .with_body(json!([record(PAGE_SIZE)]).to_string())
        .create_async()
        .await;

    let examples = client_for(&server.url())
        .list_examples("ds-1")
        .await
        .unwrap();

    first_page.assert_async().await;
    second_page.assert_async().await;
    assert_eq!(examples.len(), PAGE_SIZE + 1);
    assert_eq!(examples[0].question, "question 0");
    assert_eq!(examples[PAGE_SIZE].reference_answer, format!("answer {PAGE_SIZE}"));
}

#[tokio::test]
async fn create_examples_posts_bulk_payload() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/examples/bulk")
        .match_header("x-api-key", "ls-key")
        .match_body(Matcher::Json(json!([
            {"dataset_id": "ds-1", "inputs": {"HUMAN": "Who wrote Dracula?"}, "outputs": {"AI": "Bram Stoker"}}
        ])))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    client_for(&server.url())
        .create_examples("ds-1", &[NewExample::new("Who wrote Dracula?", "Bram Stoker")])
        .await
        .unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_key_is_auth_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", examples_path())
        .with_status(401)
        .with_body(r#"{"detail":"Invalid token"}"#)
        .create_async()
        .await;

    let err = client_for(&server.url())
        .list_examples("ds-1")
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::AuthError(ref msg) if msg.contains("Invalid token")));
}

#[tokio::test]
async fn experiment_records_runs_and_feedback() {
    let mut server = mockito::Server::new_async().await;
    let session = server
        .mock("POST", "/api/v1/sessions")
        .match_body(Matcher::PartialJson(json!({
            "description": "desc",
            "reference_dataset_id": "ds-1"
        })))
        .with_status(200)
        .with_body(json!({"id": "sess-1", "tenant_id": "tenant-1"}).to_string())
        .create_async()
        .await;
    let runs = server
        .mock("POST", "/api/v1/runs")
        .match_body(Matcher::PartialJson(json!({
            "run_type": "chain",
            "session_id": "sess-1"
        })))
        .with_status(202)
        .with_body("{}")
        .expect(2)
        .create_async()
        .await;
    let feedback = server
        .mock("POST", "/api/v1/feedback")
        .with_status(200)
        .with_body("{}")
        .expect(8)
        .create_async()
        .await;
    let close = server
        .mock("PATCH", "/api/v1/sessions/sess-1")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let examples: Vec<Example> = (0..2)
        .map(|idx| Example {
            id: format!("ex-{idx}"),
            question: format!("question {idx}"),
            reference_answer: format!("question {idx}"),
        })
        .collect();
    let options = ExperimentOptions {
        experiment_prefix: "BookNook-test".to_string(),
        description: "desc".to_string(),
        dataset_id: "ds-1".to_string(),
        max_concurrency: 2,
    };
    let evaluators = EvaluatorSet::standard(JudgeScorer::new(Arc::new(EchoProvider("8"))));

    let results = client_for(&server.url())
        .evaluate(&Upper, &evaluators, &examples, &options)
        .await
        .unwrap();

    session.assert_async().await;
    runs.assert_async().await;
    feedback.assert_async().await;
    close.assert_async().await;

    assert!(results.experiment_name.starts_with("BookNook-test-"));
    assert_eq!(results.experiment_name.len(), "BookNook-test-".len() + 8);
    assert_eq!(results.rows.len(), 2);
    assert_eq!(results.rows[0].question, "question 0");
    assert_eq!(results.rows[1].response, "QUESTION 1");
    assert_eq!(results.rows[1].score(Criterion::Similarity), 8);
    assert_eq!(results.rows[1].score(Criterion::Containment), 10);
    assert_eq!(
        results.results_url.as_deref(),
        Some(format!(
            "{}/o/tenant-1/datasets/ds-1/compare?selectedSessions=sess-1",
            server.url()
        ))
        .as_deref()
    );
}

#[tokio::test]
async fn failed_run_upload_aborts_experiment() {
    let mut server = mockito::Server::new_async().await;
    let _session = server
        .mock("POST", "/api/v1/sessions")
        .with_status(200)
        .with_body(json!({"id": "sess-1"}).to_string())
        .create_async()
        .await;
    let _runs = server
        .mock("POST", "/api/v1/runs")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let examples = [Example {
        id: "ex-0".to_string(),
        question: "q".to_string(),
        reference_answer: "a".to_string(),
    }];
    let options = ExperimentOptions::for_model("m", "ds-1");
    let evaluators = EvaluatorSet::new(Vec::new());
    let err = client_for(&server.url())
        .evaluate(&Upper, &evaluators, &examples, &options)
        .await
        .unwrap_err();
    assert!(matches!(err, EvalError::Tracking(LLMError::ProviderError(_))));
}

#[test]
fn results_url_drops_api_label() {
    let client = LangSmithClient::new(SecretString::new("k".to_string()), None).unwrap();
    let session = TracerSession {
        id: "sess".to_string(),
        tenant_id: Some("tenant".to_string()),
    };
    assert_eq!(
        client.results_url(&session, "ds").as_deref(),
        Some("https://smith.langchain.com/o/tenant/datasets/ds/compare?selectedSessions=sess")
    );

    let no_tenant = TracerSession {
        id: "sess".to_string(),
        tenant_id: None,
    };
    assert_eq!(client.results_url(&no_tenant, "ds"), None);
}

#[test]
fn endpoint_trailing_slash_is_normalized() {
    let client = client_for("http://localhost:1984/");
    assert_eq!(
        client.url("examples").unwrap().as_str(),
        "http://localhost:1984/api/v1/examples"
    );
}

/// Sleeps longer for earlier questions and records the peak of live calls.
struct Staggered {
    live: std::sync::atomic::AtomicUsize,
    peak: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl Target for Staggered {
    async fn invoke(&self, question: &str) -> Result<String, LLMError> {
        use std::sync::atomic::Ordering;

        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let idx: u64 = question.trim_start_matches('q').parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis((5 - idx) * 20)).await;
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(format!("answer to {question}"))
    }
}

#[tokio::test]
async fn experiment_bounds_concurrency_and_keeps_input_order() {
    let mut server = mockito::Server::new_async().await;
    let _session = server
        .mock("POST", "/api/v1/sessions")
        .with_status(200)
        .with_body(json!({"id": "sess-2"}).to_string())
        .create_async()
        .await;
    let runs = server
        .mock("POST", "/api/v1/runs")
        .with_status(202)
        .with_body("{}")
        .expect(5)
        .create_async()
        .await;
    let _close = server
        .mock("PATCH", "/api/v1/sessions/sess-2")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let examples: Vec<Example> = (0..5)
        .map(|idx| Example {
            id: format!("ex-{idx}"),
            question: format!("q{idx}"),
            reference_answer: format!("a{idx}"),
        })
        .collect();
    let options = ExperimentOptions {
        max_concurrency: 2,
        ..ExperimentOptions::for_model("m", "ds-1")
    };
    let target = Staggered {
        live: Default::default(),
        peak: Default::default(),
    };

    let results = client_for(&server.url())
        .evaluate(&target, &EvaluatorSet::new(Vec::new()), &examples, &options)
        .await
        .unwrap();

    runs.assert_async().await;
    assert!(target.peak.load(std::sync::atomic::Ordering::SeqCst) <= 2);
    let order: Vec<&str> = results.rows.iter().map(|r| r.question.as_str()).collect();
    assert_eq!(order, ["q0", "q1", "q2", "q3", "q4"]);
    assert_eq!(results.results_url, None);
}
