//! `record_user_details`: captures a visitor who wants to get in touch.

use serde::Deserialize;

/// Placeholder for optional fields the visitor did not provide.
const UNKNOWN: &str = "Unknown";

pub const DESCRIPTION: &str =
    "Use this tool to record that a user is interested in being in touch and provided an email address";

/// Typed arguments; unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordUserDetails {
    pub user_email: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_notes: Option<String>,
}

impl RecordUserDetails {
    pub fn parameters_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "user_email": {
                    "type": "string",
                    "description": "The email address of this user"
                },
                "user_name": {
                    "type": "string",
                    "description": "The user's name, if they provided it"
                },
                "user_notes": {
                    "type": "string",
                    "description": "Any additional information about the conversation that's worth recording to give context"
                }
            },
            "required": ["user_email"],
            "additionalProperties": false
        })
    }

    /// The one-line operator alert for this contact.
    pub fn alert(&self) -> String {
        format!(
            "Recording interest from {} with email: {} and notes: {}",
            or_unknown(self.user_name.as_deref()),
            self.user_email.trim(),
            or_unknown(self.user_notes.as_deref()),
        )
    }
}

fn or_unknown(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => UNKNOWN,
    }
}
