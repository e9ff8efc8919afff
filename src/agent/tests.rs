use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::chat::MessageType;
use crate::testing::{ScriptedProvider, ScriptedResponse};

fn assistant(provider: Arc<ScriptedProvider>) -> Assistant {
    Assistant::new(provider, ToolRegistry::default())
}

#[test]
fn system_prompt_is_prepended_once() {
    let messages = vec![ChatMessage::user().content("hi").build()];
    let prepared = ensure_system_prompt(messages, "sys");
    assert_eq!(prepared.len(), 2);
    assert_eq!(prepared[0].role, ChatRole::System);
    assert_eq!(prepared[0].content, "sys");

    let again = ensure_system_prompt(prepared.clone(), "other");
    assert_eq!(again, prepared);
}

#[test]
fn empty_conversation_gets_system_prompt() {
    let prepared = ensure_system_prompt(Vec::new(), "sys");
    assert_eq!(prepared.len(), 1);
    assert_eq!(prepared[0].role, ChatRole::System);
}

#[test]
fn final_answer_skips_tool_messages() {
    let messages = vec![
        ChatMessage::assistant().content("first").build(),
        ChatMessage::assistant()
            .content("checking")
            .tool_use(vec![])
            .build(),
        ChatMessage::assistant().tool_result(vec![]).build(),
    ];
    assert_eq!(final_answer(&messages), "first");
    assert_eq!(final_answer(&[]), "");
    assert_eq!(
        final_answer(&[ChatMessage::user().content("q").build()]),
        ""
    );
}

#[tokio::test]
async fn plain_answer_returns_single_message() {
    let provider = Arc::new(ScriptedProvider::texts(&["Bram Stoker wrote Dracula."]));
    let emitted = assistant(Arc::clone(&provider))
        .ask("Who wrote Dracula?")
        .await
        .unwrap();

    assert_eq!(emitted.len(), 1);
    assert_eq!(final_answer(&emitted), "Bram Stoker wrote Dracula.");

    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0][0].role, ChatRole::System);
    assert!(requests[0][0].content.starts_with(prompts::SYSTEM_PREFIX));
    assert_eq!(requests[0][1].content, "Who wrote Dracula?");
    assert_eq!(provider.tool_counts(), vec![3]);
}

#[tokio::test]
async fn tool_calls_are_executed_and_fed_back() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        ScriptedResponse::call("check_stock_availability", json!({"book_title": "Dracula"})),
        ScriptedResponse::text("We have 5 copies of Dracula."),
    ]));
    let emitted = assistant(Arc::clone(&provider))
        .ask("Is Dracula in stock?")
        .await
        .unwrap();

    assert_eq!(emitted.len(), 3);
    assert!(matches!(emitted[0].message_type, MessageType::ToolUse(_)));
    match &emitted[1].message_type {
        MessageType::ToolResult(results) => {
            assert_eq!(
                results[0].function.arguments,
                "Good news! We have 5 copies of 'Dracula' in stock."
            );
            assert_eq!(results[0].id, "call_check_stock_availability");
        }
        other => panic!("expected tool result, got {other:?}"),
    }
    assert_eq!(final_answer(&emitted), "We have 5 copies of Dracula.");

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].len(), 4);
}

#[tokio::test]
async fn tool_errors_are_reported_to_the_model() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        ScriptedResponse::call("find_book_recommendations", json!({"genre": "gothic"})),
        ScriptedResponse::text("Let me ask a bookseller."),
    ]));
    let emitted = assistant(provider).ask("Recommend me something").await.unwrap();

    match &emitted[1].message_type {
        MessageType::ToolResult(results) => {
            assert_eq!(
                results[0].function.arguments,
                "Tool error: unknown tool: find_book_recommendations"
            );
        }
        other => panic!("expected tool result, got {other:?}"),
    }
    assert_eq!(final_answer(&emitted), "Let me ask a bookseller.");
}

#[tokio::test]
async fn runaway_tool_loop_hits_step_limit() {
    let calls = (0..3)
        .map(|_| ScriptedResponse::call("get_author_info", json!({"author_name": "Bram Stoker"})))
        .collect();
    let provider = Arc::new(ScriptedProvider::new(calls));
    let err = assistant(provider)
        .with_max_steps(3)
        .ask("Tell me about Bram Stoker")
        .await
        .unwrap_err();
    assert!(matches!(err, LLMError::StepLimitExceeded { limit: 3 }));
}

#[tokio::test]
async fn provider_errors_propagate() {
    let provider = Arc::new(ScriptedProvider::new(Vec::new()));
    assert!(matches!(
        assistant(provider).ask("hi").await,
        Err(LLMError::ProviderError(_))
    ));
}

#[tokio::test]
async fn empty_registry_sends_no_tools() {
    let provider = Arc::new(ScriptedProvider::texts(&["Hello!"]));
    let assistant = Assistant::new(Arc::clone(&provider) as Arc<dyn ChatProvider>, ToolRegistry::empty())
        .with_system_prompt("custom");
    assistant.ask("hi").await.unwrap();
    assert_eq!(provider.tool_counts(), vec![0]);
    assert_eq!(provider.requests()[0][0].content, "custom");
}
