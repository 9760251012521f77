//! Tool call and tool result value types.
//!
//! The registry that resolves and executes tools lives in `alterego-tools`;
//! this module only defines what flows between the driver and the registry.

use serde::{Deserialize, Serialize};
use crate::error::ToolError;
use crate::message::{Message, MessageToolCall};

/// Name of the tool that records a visitor's contact details.
pub const RECORD_USER_DETAILS: &str = "record_user_details";

/// Name of the tool that records a question the persona could not answer.
pub const RECORD_UNKNOWN_QUESTION: &str = "record_unknown_question";

/// A request to execute a tool, with its arguments already parsed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique call ID (matches the LLM's tool_call.id)
    pub id: String,

    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON value
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Parse the raw argument text of a model tool call.
    ///
    /// An empty argument string is read as `{}`; anything else that is not
    /// valid JSON is rejected.
    pub fn from_message(call: &MessageToolCall) -> Result<Self, ToolError> {
        let raw = call.arguments.trim();
        let arguments = if raw.is_empty() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(raw).map_err(|e| ToolError::InvalidArguments {
                tool_name: call.name.clone(),
                reason: format!("arguments are not valid JSON: {e}"),
            })?
        };

        Ok(Self {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments,
        })
    }
}

/// The result of a tool execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call ID this result is for
    pub call_id: String,

    /// The serialized output sent back to the model
    pub output: String,

    /// Structured form of `output`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    /// Convert into the `tool` turn appended to the conversation.
    pub fn into_message(self) -> Message {
        Message::tool_result(self.call_id, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    fn raw_call(arguments: &str) -> MessageToolCall {
        MessageToolCall {
            id: "call_1".into(),
            name: "record_unknown_question".into(),
            arguments: arguments.into(),
        }
    }

    #[test]
    fn parses_json_arguments() {
        let call = ToolCall::from_message(&raw_call(r#"{"question":"Why?"}"#)).unwrap();
        assert_eq!(call.id, "call_1");
        assert_eq!(call.arguments["question"], "Why?");
    }

    #[test]
    fn empty_arguments_become_empty_object() {
        let call = ToolCall::from_message(&raw_call("  ")).unwrap();
        assert!(call.arguments.as_object().unwrap().is_empty());
    }

    #[test]
    fn malformed_arguments_rejected() {
        let err = ToolCall::from_message(&raw_call(r#"{"question": "#)).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn result_becomes_tool_turn() {
        let msg = ToolResult {
            call_id: "call_9".into(),
            output: r#"{"recorded":"ok"}"#.into(),
            data: None,
        }
        .into_message();
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(msg.content, r#"{"recorded":"ok"}"#);
    }
}
