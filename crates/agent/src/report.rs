//! What a single turn produced.

use alterego_core::message::{Message, Role};
use alterego_core::provider::Usage;
use serde::Serialize;

/// How a turn ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The model produced a final text answer
    Answer { text: String },
    /// The iteration guard tripped before a final answer
    Inconclusive { iterations: u32 },
}

/// Full record of one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnReport {
    /// The complete sequence: system, prior history, user message, and
    /// everything the turn appended
    pub messages: Vec<Message>,
    pub outcome: TurnOutcome,
    /// Model calls made
    pub iterations: u32,
    /// Tool calls dispatched
    pub tool_calls: usize,
    /// Token usage summed over every model call
    pub usage: Usage,
}

impl TurnReport {
    pub fn answer(&self) -> Option<&str> {
        match &self.outcome {
            TurnOutcome::Answer { text } => Some(text),
            TurnOutcome::Inconclusive { .. } => None,
        }
    }

    pub fn is_inconclusive(&self) -> bool {
        matches!(self.outcome, TurnOutcome::Inconclusive { .. })
    }

    /// Tool result turns, in the order they were appended.
    pub fn tool_results(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role == Role::Tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: TurnOutcome) -> TurnReport {
        TurnReport {
            messages: vec![
                Message::system("ctx"),
                Message::user("hi"),
                Message::tool_result("call_1", r#"{"recorded":"ok"}"#),
                Message::assistant("hello"),
            ],
            outcome,
            iterations: 2,
            tool_calls: 1,
            usage: Usage::default(),
        }
    }

    #[test]
    fn answer_accessor() {
        let r = report(TurnOutcome::Answer { text: "hello".into() });
        assert_eq!(r.answer(), Some("hello"));
        assert!(!r.is_inconclusive());
    }

    #[test]
    fn inconclusive_has_no_answer() {
        let r = report(TurnOutcome::Inconclusive { iterations: 10 });
        assert_eq!(r.answer(), None);
        assert!(r.is_inconclusive());
    }

    #[test]
    fn tool_results_filtered() {
        let r = report(TurnOutcome::Answer { text: "hello".into() });
        let ids: Vec<_> = r.tool_results().filter_map(|m| m.tool_call_id.as_deref()).collect();
        assert_eq!(ids, ["call_1"]);
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_value(TurnOutcome::Inconclusive { iterations: 3 }).unwrap();
        assert_eq!(json["kind"], "inconclusive");
        assert_eq!(json["iterations"], 3);
    }
}
