//! The persona tool registry.
//!
//! Tools form a closed set ([`PersonaTool`]). Dispatch is two-phase so the
//! driver can check a whole batch before anything fires:
//!
//! 1. [`ToolRegistry::prepare`] resolves the name and parses the arguments
//!    into a typed [`Invocation`]. Unknown names and bad arguments fail here.
//! 2. [`ToolRegistry::run`] performs the side effect and always succeeds.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use alterego_core::error::ToolError;
use alterego_core::notify::Notifier;
use alterego_core::provider::ToolDefinition;
use alterego_core::tool::{RECORD_UNKNOWN_QUESTION, RECORD_USER_DETAILS, ToolCall, ToolResult};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::record_unknown_question::{self, RecordUnknownQuestion};
use crate::record_user_details::{self, RecordUserDetails};

/// Every tool the persona can call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonaTool {
    RecordUserDetails,
    RecordUnknownQuestion,
}

impl PersonaTool {
    /// All tools, in the order they are presented to the model.
    pub const ALL: [PersonaTool; 2] = [PersonaTool::RecordUserDetails, PersonaTool::RecordUnknownQuestion];

    pub fn name(self) -> &'static str {
        match self {
            PersonaTool::RecordUserDetails => RECORD_USER_DETAILS,
            PersonaTool::RecordUnknownQuestion => RECORD_UNKNOWN_QUESTION,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PersonaTool::RecordUserDetails => record_user_details::DESCRIPTION,
            PersonaTool::RecordUnknownQuestion => record_unknown_question::DESCRIPTION,
        }
    }

    pub fn parameters_schema(self) -> serde_json::Value {
        match self {
            PersonaTool::RecordUserDetails => RecordUserDetails::parameters_schema(),
            PersonaTool::RecordUnknownQuestion => RecordUnknownQuestion::parameters_schema(),
        }
    }

    /// Convert into a ToolDefinition for sending to the LLM.
    pub fn to_definition(self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

impl FromStr for PersonaTool {
    type Err = ToolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        PersonaTool::ALL
            .into_iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }
}

impl fmt::Display for PersonaTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed arguments for one tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    RecordUserDetails(RecordUserDetails),
    RecordUnknownQuestion(RecordUnknownQuestion),
}

impl Invocation {
    pub fn tool(&self) -> PersonaTool {
        match self {
            Invocation::RecordUserDetails(_) => PersonaTool::RecordUserDetails,
            Invocation::RecordUnknownQuestion(_) => PersonaTool::RecordUnknownQuestion,
        }
    }

    fn alert(&self) -> String {
        match self {
            Invocation::RecordUserDetails(args) => args.alert(),
            Invocation::RecordUnknownQuestion(args) => args.alert(),
        }
    }
}

/// A resolved call, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCall {
    /// Echoed back unchanged as the result's `call_id`
    pub call_id: String,
    pub invocation: Invocation,
}

/// The registry of persona tools.
///
/// The agent loop uses this to:
/// 1. Get tool definitions to send to the LLM
/// 2. Resolve and execute tool calls when the LLM requests them
pub struct ToolRegistry {
    notifier: Arc<dyn Notifier>,
}

impl ToolRegistry {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Get all tool definitions (for sending to the LLM).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        PersonaTool::ALL.into_iter().map(PersonaTool::to_definition).collect()
    }

    /// List all registered tool names.
    pub fn names(&self) -> Vec<&'static str> {
        PersonaTool::ALL.into_iter().map(PersonaTool::name).collect()
    }

    /// Resolve a call's tool and parse its arguments.
    pub fn prepare(&self, call: &ToolCall) -> Result<PreparedCall, ToolError> {
        let tool: PersonaTool = call.name.parse()?;

        let invocation = match tool {
            PersonaTool::RecordUserDetails => {
                Invocation::RecordUserDetails(parse_args(tool, &call.arguments)?)
            }
            PersonaTool::RecordUnknownQuestion => {
                Invocation::RecordUnknownQuestion(parse_args(tool, &call.arguments)?)
            }
        };

        Ok(PreparedCall {
            call_id: call.id.clone(),
            invocation,
        })
    }

    /// Perform the side effect and acknowledge.
    ///
    /// Notification failures are absorbed by the notifier, so this never fails.
    pub async fn run(&self, prepared: PreparedCall) -> ToolResult {
        let tool = prepared.invocation.tool();
        info!(tool = %tool, call_id = %prepared.call_id, "Running tool");

        self.notifier.notify(&prepared.invocation.alert()).await;

        let data = serde_json::json!({ "recorded": "ok" });
        debug!(tool = %tool, "Tool acknowledged");

        ToolResult {
            call_id: prepared.call_id,
            output: data.to_string(),
            data: Some(data),
        }
    }

    /// Resolve and run a single call.
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let prepared = self.prepare(call)?;
        Ok(self.run(prepared).await)
    }
}

fn parse_args<T: DeserializeOwned>(tool: PersonaTool, arguments: &serde_json::Value) -> Result<T, ToolError> {
    serde_json::from_value(arguments.clone()).map_err(|e| ToolError::InvalidArguments {
        tool_name: tool.name().to_string(),
        reason: e.to_string(),
    })
}
