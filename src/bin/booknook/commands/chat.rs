use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use booknook::{
    agent::Assistant,
    chat::ChatMessage,
    config::AppConfig,
};

use crate::runtime;

const GREETING: &str = "Hello! Welcome to the Book Nook. How can I help you today?";
const FAREWELL: &str = "Happy reading! Goodbye!";
const FALLBACK_QUESTION: &str = "What are your store hours?";

pub async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let assistant = runtime::assistant(runtime::gemini_provider(config)?);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    chat_loop(&assistant, stdin, &mut stdout).await
}

/// Reads one question per line until end of input or a farewell word.
async fn chat_loop<R, W>(assistant: &Assistant, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "Assistant: {GREETING}")?;
    let mut lines = input.lines();
    loop {
        write!(out, "User: ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            return Ok(());
        };
        let line = line.trim();
        if is_farewell(line) {
            writeln!(out, "{FAREWELL}")?;
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }
        if let Err(err) = answer(assistant, line, out).await {
            log::warn!("chat turn failed: {err:#}");
            writeln!(out, "An error occurred: {err}")?;
            writeln!(out, "\nDefaulting to a sample question…")?;
            if let Err(err) = answer(assistant, FALLBACK_QUESTION, out).await {
                writeln!(out, "An error occurred: {err}")?;
            }
        }
    }
}

fn is_farewell(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "quit" | "exit" | "bye")
}

async fn answer<W: Write>(assistant: &Assistant, question: &str, out: &mut W) -> anyhow::Result<()> {
    let emitted = assistant.ask(question).await?;
    for text in printable(&emitted) {
        writeln!(out, "Assistant: {text}")?;
    }
    Ok(())
}

fn printable(messages: &[ChatMessage]) -> impl Iterator<Item = &str> {
    messages
        .iter()
        .filter(|m| m.is_assistant_text() && !m.content.is_empty())
        .map(|m| m.content.as_str())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use booknook::{
        chat::{ChatProvider, ChatResponse, TextResponse, Tool},
        error::LLMError,
        tools::ToolRegistry,
    };

    use super::*;

    /// Pops one reply per request; `None` fails the request.
    struct Replies(Mutex<VecDeque<Option<&'static str>>>);

    #[async_trait]
    impl ChatProvider for Replies {
        async fn chat_with_tools(
            &self,
            _messages: &[ChatMessage],
            _tools: Option<&[Tool]>,
        ) -> Result<Box<dyn ChatResponse>, LLMError> {
            match self.0.lock().unwrap().pop_front().flatten() {
                Some(text) => Ok(Box::new(TextResponse {
                    text: text.to_string(),
                })),
                None => Err(LLMError::HttpError("offline".to_string())),
            }
        }
    }

    async fn transcript(replies: Vec<Option<&'static str>>, input: &str) -> String {
        let provider = Arc::new(Replies(Mutex::new(replies.into())));
        let assistant = Assistant::new(provider, ToolRegistry::default());
        let mut out = Vec::new();
        chat_loop(&assistant, input.as_bytes(), &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn answers_until_farewell() {
        let out = transcript(
            vec![Some("Bram Stoker wrote Dracula.")],
            "Who wrote Dracula?\nBYE\nnever read\n",
        )
        .await;
        assert!(out.starts_with(&format!("Assistant: {GREETING}\n")));
        assert!(out.contains("Assistant: Bram Stoker wrote Dracula.\n"));
        assert!(out.ends_with(&format!("{FAREWELL}\n")));
    }

    #[tokio::test]
    async fn failed_turn_falls_back_to_sample_question() {
        let out = transcript(
            vec![None, Some("We open at 10:00 AM.")],
            "Who wrote Dracula?\n",
        )
        .await;
        assert!(out.contains("An error occurred: HTTP error: offline"));
        assert!(out.contains("Defaulting to a sample question"));
        assert!(out.contains("Assistant: We open at 10:00 AM.\n"));
    }

    #[test]
    fn farewells_are_case_insensitive() {
        assert!(is_farewell("Quit"));
        assert!(is_farewell("exit"));
        assert!(!is_farewell("goodbye"));
    }
}
