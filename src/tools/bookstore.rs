//! Mocked bookstore lookups. Every function here is pure and deterministic.

use std::sync::Arc;

use serde_json::Value;

use super::definition::{ToolDefinition, ToolParam};
use super::error::ToolError;

const STOCK: &[(&str, u32)] = &[
    ("dracula", 5),
    ("the midnight library", 3),
    ("project hail mary", 0),
    ("sherlock holmes", 8),
];

const AUTHORS: &[(&str, &str)] = &[
    (
        "bram stoker",
        "Bram Stoker (1847–1912) was an Irish author, best known for 'Dracula' (1897).",
    ),
    (
        "sir arthur conan doyle",
        "Sir Arthur Conan Doyle (1859–1930) created Sherlock Holmes and was a physician.",
    ),
    (
        "agatha christie",
        "Agatha Christie (1890–1976) wrote 66 detective novels (Poirot, Miss Marple).",
    ),
];

/// Reports availability of a title. The first catalogue title contained in
/// the lower-cased query wins.
pub fn check_stock(book_title: &str) -> String {
    let key = book_title.to_lowercase();
    match STOCK.iter().find(|(title, _)| key.contains(title)) {
        Some((_, 0)) => {
            format!("'{book_title}' is currently out of stock, but we can order it for you.")
        }
        Some((_, count)) => {
            format!("Good news! We have {count} copies of '{book_title}' in stock.")
        }
        None => format!(
            "I couldn't find '{book_title}' in our system. \
             Can you check the spelling or provide the author?"
        ),
    }
}

/// Short biography for a known author, matched like [`check_stock`].
pub fn author_info(author_name: &str) -> String {
    let key = author_name.to_lowercase();
    AUTHORS
        .iter()
        .find(|(name, _)| key.contains(name))
        .map(|(_, bio)| bio.to_string())
        .unwrap_or_else(|| {
            format!("I don't have info on {author_name} right now, but I can search for their works.")
        })
}

/// Hands the conversation to a human bookseller (mocked).
pub fn escalate_to_human(summary: &str) -> String {
    let summary = summary.trim();
    if summary.is_empty() {
        "I've asked one of our booksellers to join the conversation. They'll be with you shortly."
            .to_string()
    } else {
        format!(
            "I've passed your request to one of our booksellers: \"{summary}\". \
             They'll be with you shortly."
        )
    }
}

/// The tools the Book Nook assistant is allowed to call.
pub fn bookstore_tools() -> Vec<ToolDefinition> {
    vec![stock_tool(), author_tool(), escalation_tool()]
}

fn stock_tool() -> ToolDefinition {
    ToolDefinition {
        name: "check_stock_availability",
        description: "Checks if a specific book is currently in stock at Book Nook.",
        params: vec![ToolParam::string("book_title", "Title of the book to look up.")],
        required: vec!["book_title"],
        executor: Arc::new(exec_stock),
    }
}

fn author_tool() -> ToolDefinition {
    ToolDefinition {
        name: "get_author_info",
        description: "Provides a brief biography for a given author.",
        params: vec![ToolParam::string("author_name", "Full name of the author.")],
        required: vec!["author_name"],
        executor: Arc::new(exec_author),
    }
}

fn escalation_tool() -> ToolDefinition {
    ToolDefinition {
        name: "escalate_to_human",
        description: "Hands the conversation to a human bookseller. \
                      Include a short summary of the reader's needs.",
        params: vec![ToolParam::string(
            "summary",
            "Brief summary of the conversation for the bookseller.",
        )],
        required: vec!["summary"],
        executor: Arc::new(exec_escalation),
    }
}

fn exec_stock(args: &Value) -> Result<String, ToolError> {
    Ok(check_stock(str_arg(args, "book_title")?))
}

fn exec_author(args: &Value) -> Result<String, ToolError> {
    Ok(author_info(str_arg(args, "author_name")?))
}

fn exec_escalation(args: &Value) -> Result<String, ToolError> {
    Ok(escalate_to_human(str_arg(args, "summary")?))
}

fn str_arg<'a>(args: &'a Value, name: &'static str) -> Result<&'a str, ToolError> {
    args.get(name)
        .and_then(Value::as_str)
        .ok_or(ToolError::MissingArg(name))
}
