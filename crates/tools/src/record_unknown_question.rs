//! `record_unknown_question`: flags a question the persona could not answer.

use serde::Deserialize;

pub const DESCRIPTION: &str =
    "Always use this tool to record any question that couldn't be answered as you didn't know the answer";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordUnknownQuestion {
    pub question: String,
}

impl RecordUnknownQuestion {
    pub fn parameters_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "The question that couldn't be answered"
                }
            },
            "required": ["question"],
            "additionalProperties": false
        })
    }

    pub fn alert(&self) -> String {
        format!(
            "Recording unknown question: {} that I couldn't answer",
            self.question.trim()
        )
    }
}
