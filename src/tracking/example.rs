use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Key of the question inside an example's inputs.
pub const INPUT_KEY: &str = "HUMAN";
/// Key of the reference answer inside an example's outputs.
pub const REFERENCE_KEY: &str = "AI";
/// Key of the produced answer inside a run's outputs.
pub const OUTPUT_KEY: &str = "output";

/// A stored question with its reference answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    /// Opaque dataset-assigned identifier
    pub id: String,
    pub question: String,
    pub reference_answer: String,
}

/// An example not yet stored, so without an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExample {
    pub question: String,
    pub reference_answer: String,
}

impl NewExample {
    pub fn new(question: impl Into<String>, reference_answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            reference_answer: reference_answer.into(),
        }
    }

    pub(crate) fn inputs(&self) -> Value {
        json!({ INPUT_KEY: self.question })
    }

    pub(crate) fn outputs(&self) -> Value {
        json!({ REFERENCE_KEY: self.reference_answer })
    }
}

/// Example as the dataset API returns it.
#[derive(Debug, Deserialize)]
pub(crate) struct ExampleRecord {
    id: String,
    #[serde(default)]
    inputs: Map<String, Value>,
    #[serde(default)]
    outputs: Option<Map<String, Value>>,
}

impl From<ExampleRecord> for Example {
    fn from(record: ExampleRecord) -> Self {
        let question = string_field(Some(&record.inputs), INPUT_KEY);
        let reference_answer = string_field(record.outputs.as_ref(), REFERENCE_KEY);
        Self {
            id: record.id,
            question,
            reference_answer,
        }
    }
}

fn string_field(map: Option<&Map<String, Value>>, key: &str) -> String {
    map.and_then(|m| m.get(key))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

const SEED: [(&str, &str); 6] = [
    (
        "Who wrote the Sherlock Holmes stories?",
        "The brilliant Sherlock Holmes stories were written by **Sir Arthur Conan Doyle**. Are you thinking of diving into his classic mysteries?",
    ),
    (
        "Who wrote Dracula?",
        "**Bram Stoker** is the author of the timeless gothic horror novel, 'Dracula'. It's a masterpiece of the genre!",
    ),
    (
        "What is this month's book club pick?",
        "This month, our book club is diving into a classic! We're reading **'Dracula'** by Bram Stoker. We meet on the last Thursday of the month and would love to see you there.",
    ),
    (
        "What are Book Nook's store hours?",
        "Our store hours are:\n\n- **Monday - Saturday:** 10:00 AM to 8:00 PM\n- **Sunday:** 12:00 PM to 6:00 PM\n\nWe look forward to seeing you!",
    ),
    (
        "I need a recommendation. I enjoy classic mysteries like Sherlock Holmes.",
        "That's wonderful taste! If you enjoy the deductive reasoning of Sherlock Holmes, you should definitely try **Agatha Christie's** work, particularly 'And Then There Were None.' It's a masterclass in suspense.",
    ),
    (
        "What is 25 times 8?",
        "My expertise is in the world of books! While I can't help with math, I can certainly help you find a great book on mathematics or logic. Are you interested?",
    ),
];

/// The fixed Book Nook evaluation set: literary facts, store information,
/// a recommendation and one off-topic question.
pub fn seed_examples() -> Vec<NewExample> {
    SEED.iter()
        .map(|(question, answer)| NewExample::new(*question, *answer))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_maps_wire_keys() {
        let record: ExampleRecord = serde_json::from_value(json!({
            "id": "ex-1",
            "inputs": {"HUMAN": "Who wrote Dracula?"},
            "outputs": {"AI": "Bram Stoker"},
            "dataset_id": "ds"
        }))
        .unwrap();
        let example = Example::from(record);
        assert_eq!(example.id, "ex-1");
        assert_eq!(example.question, "Who wrote Dracula?");
        assert_eq!(example.reference_answer, "Bram Stoker");
    }

    #[test]
    fn missing_keys_read_as_empty() {
        let record: ExampleRecord =
            serde_json::from_value(json!({"id": "ex-2", "inputs": {"question": "?"}, "outputs": null}))
                .unwrap();
        let example = Example::from(record);
        assert_eq!(example.question, "");
        assert_eq!(example.reference_answer, "");
    }

    #[test]
    fn seed_set_has_six_distinct_questions() {
        let seed = seed_examples();
        assert_eq!(seed.len(), 6);
        assert_eq!(seed[1].question, "Who wrote Dracula?");
        assert!(seed[1].reference_answer.contains("Bram Stoker"));
        let questions: std::collections::BTreeSet<_> =
            seed.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions.len(), 6);
    }

    #[test]
    fn new_example_payloads_use_dataset_keys() {
        let example = NewExample::new("q", "a");
        assert_eq!(example.inputs(), json!({"HUMAN": "q"}));
        assert_eq!(example.outputs(), json!({"AI": "a"}));
    }
}
