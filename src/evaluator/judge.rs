use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::{
    chat::{ChatMessage, ChatProvider},
    error::LLMError,
};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;
/// Returned when the judge reply carries no number.
pub const NEUTRAL_SCORE: u8 = 5;

/// Asks a judge model for a 1–10 score and parses it leniently.
#[derive(Clone)]
pub struct JudgeScorer {
    provider: Arc<dyn ChatProvider>,
}

impl JudgeScorer {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Sends `prompt` as a single user message. Transport errors propagate;
    /// an unparseable reply does not.
    pub async fn score(&self, prompt: &str) -> Result<u8, LLMError> {
        let request = [ChatMessage::user().content(prompt).build()];
        let response = self.provider.chat(&request).await?;
        let raw = response.text().unwrap_or_default();
        let score = parse_score(&raw);
        log::debug!("judge replied {:?} -> {score}", raw.trim());
        Ok(score)
    }
}

/// First run of one or two decimal digits (any script), clamped to
/// `[MIN_SCORE, MAX_SCORE]`. Replies without digits score [`NEUTRAL_SCORE`].
pub fn parse_score(raw: &str) -> u8 {
    static SCORE: OnceLock<Regex> = OnceLock::new();
    let re = SCORE.get_or_init(|| Regex::new(r"(\d{1,2})").expect("score pattern is valid"));
    re.captures(raw.trim())
        .and_then(|caps| {
            caps[1]
                .chars()
                .try_fold(0u32, |acc, c| Some(acc * 10 + digit_value(c)?))
        })
        .map(|score| score.clamp(u32::from(MIN_SCORE), u32::from(MAX_SCORE)) as u8)
        .unwrap_or(NEUTRAL_SCORE)
}

/// Value of a Unicode decimal digit. Decimal digits are assigned in
/// contiguous runs of ten starting at zero, so the value is the distance
/// from the start of the run modulo ten.
fn digit_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut offset = 0;
    let mut code = u32::from(c);
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        offset += 1;
        code -= 1;
    }
    Some(offset % 10)
}

fn is_decimal_digit(c: char) -> bool {
    static DIGIT: OnceLock<Regex> = OnceLock::new();
    let re = DIGIT.get_or_init(|| Regex::new(r"^\d$").expect("digit pattern is valid"));
    re.is_match(c.encode_utf8(&mut [0; 4]))
}
