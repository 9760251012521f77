//! Shared test doubles for driver tests.

use std::sync::Mutex;
use std::time::Duration;

use alterego_core::error::ProviderError;
use alterego_core::message::{Message, MessageToolCall};
use alterego_core::provider::{Provider, ProviderRequest, ProviderResponse, StopReason, Usage};

/// A mock provider that returns a sequence of scripted responses and keeps
/// every request it saw.
///
/// Panics if more calls are made than responses provided.
pub struct ScriptedProvider {
    responses: Mutex<Vec<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    pub fn tools_then_answer(calls: Vec<MessageToolCall>, answer: &str) -> Self {
        Self::new(vec![make_tool_call_response(calls), make_text_response(answer)])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let index = requests.len();

        if index >= responses.len() {
            panic!(
                "ScriptedProvider: no more responses (call #{index}, have {})",
                responses.len()
            );
        }

        requests.push(request);
        Ok(responses[index].clone())
    }
}

/// Always fails with the given error.
pub struct FailingProvider(pub ProviderError);

#[async_trait::async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(self.0.clone())
    }
}

/// Sleeps before answering.
pub struct SlowProvider(pub Duration);

#[async_trait::async_trait]
impl Provider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        tokio::time::sleep(self.0).await;
        Ok(make_text_response("too late"))
    }
}

fn usage() -> Option<Usage> {
    Some(Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    })
}

/// A final text answer.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        stop_reason: StopReason::Stop,
        usage: usage(),
        model: "mock-model".into(),
    }
}

/// A response that requests the given tool calls.
pub fn make_tool_call_response(calls: Vec<MessageToolCall>) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant_with_tools("", calls),
        stop_reason: StopReason::ToolCalls,
        usage: usage(),
        model: "mock-model".into(),
    }
}

/// A tool call with JSON arguments, id derived from `id_suffix`.
pub fn make_tool_call(id_suffix: &str, name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{id_suffix}"),
        name: name.to_string(),
        arguments: serde_json::to_string(&args).unwrap(),
    }
}
