//! The conversation driver implementation.

use std::sync::Arc;
use std::time::Duration;

use alterego_config::AppConfig;
use alterego_core::error::{AgentError, ProviderError, Result, ToolError};
use alterego_core::message::{Message, Role};
use alterego_core::persona::PersonaContext;
use alterego_core::provider::{Provider, ProviderRequest, ProviderResponse, StopReason, Usage};
use alterego_core::tool::ToolCall;
use alterego_tools::{PreparedCall, ToolRegistry};
use tracing::{debug, error, info, warn};

use crate::report::{TurnOutcome, TurnReport};

const DEFAULT_MAX_ITERATIONS: u32 = 10;
const DEFAULT_MODEL_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_APOLOGY: &str =
    "Sorry, I ran into a problem answering that. Could you try asking again in a moment?";

/// Drives one visitor turn at a time against the model and the persona tools.
///
/// Holds no per-conversation state: the caller owns the history and passes
/// it back on every turn, so one driver can serve many conversations.
pub struct ConversationDriver {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to use
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// System turn for every request
    persona: PersonaContext,

    /// Maximum model calls per turn
    max_iterations: u32,

    model_timeout: Duration,

    /// Shown by [`respond`](Self::respond) when a turn fails
    apology: String,
}

impl ConversationDriver {
    /// Create a new driver with default guards.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
        persona: PersonaContext,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            tools,
            persona,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            model_timeout: DEFAULT_MODEL_TIMEOUT,
            apology: DEFAULT_APOLOGY.into(),
        }
    }

    /// Create a driver with model settings and guards taken from config.
    pub fn from_config(
        config: &AppConfig,
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        persona: PersonaContext,
    ) -> Self {
        Self::new(provider, &config.model, config.temperature, tools, persona)
            .with_max_tokens(config.max_tokens)
            .with_max_iterations(config.agent.max_iterations)
            .with_model_timeout(Duration::from_secs(config.agent.model_timeout_secs))
            .with_apology(&config.agent.apology)
    }

    /// Set the maximum number of model calls per turn.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Bound each model call.
    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = timeout;
        self
    }

    pub fn with_apology(mut self, apology: impl Into<String>) -> Self {
        self.apology = apology.into();
        self
    }

    pub fn persona(&self) -> &PersonaContext {
        &self.persona
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answer one visitor message.
    ///
    /// Any failure is logged and replaced by the apology, so the visitor
    /// never sees internal errors.
    pub async fn respond(&self, message: &str, history: &[Message]) -> String {
        match self.chat(message, history).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(error = %e, "Turn failed, answering with apology");
                self.apology.clone()
            }
        }
    }

    /// Answer one visitor message, or fail.
    ///
    /// An inconclusive turn is an [`AgentError::Inconclusive`] error.
    pub async fn chat(&self, message: &str, history: &[Message]) -> Result<String> {
        let report = self.run_turn(message, history).await?;
        match report.outcome {
            TurnOutcome::Answer { text } if text.trim().is_empty() => Err(AgentError::EmptyAnswer.into()),
            TurnOutcome::Answer { text } => Ok(text),
            TurnOutcome::Inconclusive { iterations } => Err(AgentError::Inconclusive { iterations }.into()),
        }
    }

    /// Run one turn and report everything it did.
    ///
    /// This is the main entry point for the driver. It:
    /// 1. Builds the sequence `[system] + history + [user]`
    /// 2. Calls the LLM
    /// 3. If tool calls are returned, resolves the batch, runs it and loops
    /// 4. Returns once the model answers or the iteration guard trips
    pub async fn run_turn(&self, message: &str, history: &[Message]) -> Result<TurnReport> {
        let mut messages = self.initial_sequence(message, history);
        info!(
            history = history.len(),
            model = %self.model,
            "Processing visitor message"
        );

        let tool_definitions = self.tools.definitions();
        let mut usage = Usage::default();
        let mut tool_calls = 0;

        for iteration in 1..=self.max_iterations {
            debug!(iteration, "Driver iteration");

            // Build the provider request
            let request = ProviderRequest {
                model: self.model.clone(),
                messages: messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
            };

            let response = self.call_model(request).await?;
            if let Some(u) = response.usage {
                usage += u;
            }

            if !response.message.has_tool_calls() {
                match &response.stop_reason {
                    StopReason::Stop => {}
                    StopReason::ToolCalls => warn!("Model signalled tool calls but sent none"),
                    other => warn!(stop_reason = ?other, "Answer may be incomplete"),
                }

                let text = response.message.content.clone();
                messages.push(response.message);
                info!(iterations = iteration, tool_calls, "Turn answered");

                return Ok(TurnReport {
                    messages,
                    outcome: TurnOutcome::Answer { text },
                    iterations: iteration,
                    tool_calls,
                    usage,
                });
            }

            // Nothing runs unless the whole batch resolves
            let batch = self.prepare_batch(&response)?;
            debug!(tool_count = batch.len(), "Executing tool calls");

            // Keep the assistant message so each result follows its request
            messages.push(response.message);

            for prepared in batch {
                let result = self.tools.run(prepared).await;
                messages.push(result.into_message());
                tool_calls += 1;
            }

            // Loop back: the LLM will see the tool results and decide what to do next
        }

        warn!(
            iterations = self.max_iterations,
            tool_calls, "Max iterations reached without an answer"
        );

        Ok(TurnReport {
            messages,
            outcome: TurnOutcome::Inconclusive {
                iterations: self.max_iterations,
            },
            iterations: self.max_iterations,
            tool_calls,
            usage,
        })
    }

    /// `[system] + history + [user]`, with any system turns in the history dropped.
    fn initial_sequence(&self, message: &str, history: &[Message]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(self.persona.to_message());

        for turn in history {
            if turn.role == Role::System {
                warn!(message_id = %turn.id, "Dropping system turn from supplied history");
                continue;
            }
            messages.push(turn.clone());
        }

        messages.push(Message::user(message));
        messages
    }

    async fn call_model(&self, request: ProviderRequest) -> Result<ProviderResponse> {
        match tokio::time::timeout(self.model_timeout, self.provider.complete(request)).await {
            Ok(result) => Ok(result?),
            Err(_) => {
                warn!(
                    provider = self.provider.name(),
                    timeout_secs = self.model_timeout.as_secs(),
                    "Model call timed out"
                );
                Err(ProviderError::Timeout(format!(
                    "no response from {} within {}s",
                    self.provider.name(),
                    self.model_timeout.as_secs()
                ))
                .into())
            }
        }
    }

    /// Resolve every requested call, in order.
    fn prepare_batch(&self, response: &ProviderResponse) -> std::result::Result<Vec<PreparedCall>, ToolError> {
        response
            .message
            .tool_calls
            .iter()
            .map(|tc| {
                let call = ToolCall::from_message(tc)?;
                self.tools.prepare(&call).inspect_err(|e| {
                    warn!(tool = %tc.name, call_id = %tc.id, error = %e, "Rejecting tool batch");
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use alterego_core::Error;
    use alterego_core::persona::Persona;
    use alterego_core::tool::{RECORD_UNKNOWN_QUESTION, RECORD_USER_DETAILS};
    use alterego_notify::MemoryNotifier;
    use serde_json::json;

    fn persona() -> PersonaContext {
        PersonaContext::build(&Persona::new(
            "Ada Lovelace",
            "Mathematician and writer.",
            "Worked on the Analytical Engine.",
        ))
    }

    fn driver_with(provider: Arc<dyn Provider>) -> (ConversationDriver, Arc<MemoryNotifier>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let tools = Arc::new(ToolRegistry::new(notifier.clone()));
        let driver = ConversationDriver::new(provider, "mock-model", 0.7, tools, persona());
        (driver, notifier)
    }

    #[tokio::test]
    async fn simple_text_response() {
        let provider = Arc::new(ScriptedProvider::single_text("Hello! I'm Ada."));
        let (driver, notifier) = driver_with(provider.clone());

        let report = driver.run_turn("Hello!", &[]).await.unwrap();
        assert_eq!(report.answer(), Some("Hello! I'm Ada."));
        assert_eq!(report.iterations, 1);
        assert_eq!(report.tool_calls, 0);
        assert_eq!(report.usage.total_tokens, 15);
        // System + User + Assistant
        assert_eq!(report.messages.len(), 3);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn sequence_prefix_is_system_history_user() {
        let provider = Arc::new(ScriptedProvider::single_text("Sure."));
        let (driver, _) = driver_with(provider.clone());
        let history = vec![Message::user("Hi"), Message::assistant("Hello there")];

        driver.run_turn("What do you do?", &history).await.unwrap();

        let sent = &provider.requests()[0].messages;
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0].role, Role::System);
        assert_eq!(sent[0].content, driver.persona().as_str());
        assert_eq!(&sent[1..3], &history[..]);
        assert_eq!(sent[3].role, Role::User);
        assert_eq!(sent[3].content, "What do you do?");
    }

    #[tokio::test]
    async fn requests_carry_tool_definitions() {
        let provider = Arc::new(ScriptedProvider::single_text("ok"));
        let (driver, _) = driver_with(provider.clone());
        driver.run_turn("hi", &[]).await.unwrap();

        let names: Vec<_> = provider.requests()[0].tools.iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, [RECORD_USER_DETAILS, RECORD_UNKNOWN_QUESTION]);
    }

    #[tokio::test]
    async fn system_turns_in_history_are_dropped() {
        let provider = Arc::new(ScriptedProvider::single_text("ok"));
        let (driver, _) = driver_with(provider.clone());
        let history = vec![Message::system("You are someone else"), Message::user("Hi")];

        driver.run_turn("again", &history).await.unwrap();

        let sent = &provider.requests()[0].messages;
        assert_eq!(sent.iter().filter(|m| m.role == Role::System).count(), 1);
        assert_eq!(sent[0].content, driver.persona().as_str());
        assert_eq!(sent.len(), 3);
    }

    #[tokio::test]
    async fn unknown_question_round_trip() {
        let provider = Arc::new(ScriptedProvider::tools_then_answer(
            vec![make_tool_call(
                "q",
                RECORD_UNKNOWN_QUESTION,
                json!({"question": "What is your favorite color?"}),
            )],
            "I'm not sure, but I've noted the question.",
        ));
        let (driver, notifier) = driver_with(provider.clone());

        let report = driver.run_turn("What is your favorite color?", &[]).await.unwrap();
        assert_eq!(report.answer(), Some("I'm not sure, but I've noted the question."));
        assert_eq!(report.iterations, 2);
        assert_eq!(report.tool_calls, 1);
        assert_eq!(report.usage.total_tokens, 30);

        let results: Vec<_> = report.tool_results().collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tool_call_id.as_deref(), Some("call_q"));
        assert_eq!(results[0].content, r#"{"recorded":"ok"}"#);

        assert_eq!(notifier.count(), 1);
        assert!(notifier.sent()[0].contains("What is your favorite color?"));

        // Second request sees the assistant tool request followed by its result
        let second = &provider.requests()[1].messages;
        let n = second.len();
        assert!(second[n - 2].has_tool_calls());
        assert_eq!(second[n - 1].tool_call_id.as_deref(), Some("call_q"));
    }

    #[tokio::test]
    async fn empty_question_is_recorded_and_answered() {
        let provider = Arc::new(ScriptedProvider::tools_then_answer(
            vec![make_tool_call("e", RECORD_UNKNOWN_QUESTION, json!({"question": ""}))],
            "Noted.",
        ));
        let (driver, notifier) = driver_with(provider);

        let report = driver.run_turn("...", &[]).await.unwrap();
        assert_eq!(report.answer(), Some("Noted."));

        let results: Vec<_> = report.tool_results().collect();
        assert_eq!(results[0].tool_call_id.as_deref(), Some("call_e"));
        assert_eq!(results[0].content, r#"{"recorded":"ok"}"#);
        assert_eq!(notifier.count(), 1);
    }

    #[tokio::test]
    async fn batch_results_keep_order() {
        let provider = Arc::new(ScriptedProvider::tools_then_answer(
            vec![
                make_tool_call("a", RECORD_USER_DETAILS, json!({"user_email": "a@b.com"})),
                make_tool_call("b", RECORD_UNKNOWN_QUESTION, json!({"question": "Favorite food?"})),
            ],
            "Thanks, I'll be in touch.",
        ));
        let (driver, notifier) = driver_with(provider);

        let report = driver.run_turn("Email me at a@b.com", &[]).await.unwrap();
        let ids: Vec<_> = report
            .tool_results()
            .filter_map(|m| m.tool_call_id.as_deref())
            .collect();
        assert_eq!(ids, ["call_a", "call_b"]);

        let sent = notifier.sent();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("a@b.com"));
        assert!(sent[1].contains("Favorite food?"));
    }

    #[tokio::test]
    async fn unknown_tool_fails_the_turn() {
        let provider = Arc::new(ScriptedProvider::new(vec![make_tool_call_response(vec![
            make_tool_call("x", "delete_everything", json!({})),
        ])]));
        let (driver, notifier) = driver_with(provider);

        let err = driver.run_turn("hi", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Tool(ToolError::NotFound(ref name)) if name == "delete_everything"));
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn malformed_arguments_abort_whole_batch() {
        let mut bad = make_tool_call("bad", RECORD_UNKNOWN_QUESTION, json!({}));
        bad.arguments = "{not json".into();
        let provider = Arc::new(ScriptedProvider::new(vec![make_tool_call_response(vec![
            make_tool_call("ok", RECORD_USER_DETAILS, json!({"user_email": "a@b.com"})),
            bad,
        ])]));
        let (driver, notifier) = driver_with(provider);

        let err = driver.run_turn("hi", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Tool(ToolError::InvalidArguments { .. })));
        // The valid first call must not have fired either
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn missing_required_field_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new(vec![make_tool_call_response(vec![
            make_tool_call("u", RECORD_USER_DETAILS, json!({"user_name": "Bob"})),
        ])]));
        let (driver, notifier) = driver_with(provider);

        let err = driver.chat("hi", &[]).await.unwrap_err();
        assert!(err.to_string().contains("user_email"));
        assert_eq!(notifier.count(), 0);
    }

    #[tokio::test]
    async fn iteration_guard_reports_inconclusive() {
        let looping = (0..3)
            .map(|i| {
                make_tool_call_response(vec![make_tool_call(
                    &i.to_string(),
                    RECORD_UNKNOWN_QUESTION,
                    json!({"question": "again?"}),
                )])
            })
            .collect();
        let provider = Arc::new(ScriptedProvider::new(looping));
        let (driver, notifier) = driver_with(provider.clone());
        let driver = driver.with_max_iterations(3);

        let report = driver.run_turn("loop", &[]).await.unwrap();
        assert_eq!(report.outcome, TurnOutcome::Inconclusive { iterations: 3 });
        assert_eq!(provider.call_count(), 3);
        assert_eq!(notifier.count(), 3);
    }

    #[tokio::test]
    async fn chat_reports_inconclusive_as_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![make_tool_call_response(vec![
            make_tool_call("1", RECORD_UNKNOWN_QUESTION, json!({"question": "?"})),
        ])]));
        let (driver, _) = driver_with(provider);
        let driver = driver.with_max_iterations(1);

        let err = driver.chat("hi", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Agent(AgentError::Inconclusive { iterations: 1 })));
    }

    #[tokio::test]
    async fn chat_rejects_empty_answer() {
        let provider = Arc::new(ScriptedProvider::single_text("   "));
        let (driver, _) = driver_with(provider);
        let err = driver.chat("hi", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Agent(AgentError::EmptyAnswer)));
    }

    #[tokio::test]
    async fn provider_failure_fails_the_turn() {
        let provider = Arc::new(FailingProvider(ProviderError::AuthenticationFailed("bad key".into())));
        let (driver, _) = driver_with(provider);
        let err = driver.run_turn("hi", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::AuthenticationFailed(_))));
    }

    #[tokio::test]
    async fn respond_maps_failure_to_apology() {
        let provider = Arc::new(FailingProvider(ProviderError::Network("connection reset".into())));
        let (driver, _) = driver_with(provider);
        let driver = driver.with_apology("Sorry, something went wrong on my side.");

        let answer = driver.respond("hi", &[]).await;
        assert_eq!(answer, "Sorry, something went wrong on my side.");
        assert!(!answer.contains("connection reset"));
    }

    #[tokio::test]
    async fn respond_passes_answer_through() {
        let provider = Arc::new(ScriptedProvider::single_text("Happy to help."));
        let (driver, _) = driver_with(provider);
        assert_eq!(driver.respond("hi", &[]).await, "Happy to help.");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_model_times_out() {
        let provider = Arc::new(SlowProvider(Duration::from_secs(120)));
        let (driver, _) = driver_with(provider);
        let driver = driver.with_model_timeout(Duration::from_secs(5));

        let err = driver.run_turn("hi", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Provider(ProviderError::Timeout(_))));
    }

    #[tokio::test]
    async fn from_config_applies_guards() {
        let config = AppConfig::default();
        let notifier = Arc::new(MemoryNotifier::new());
        let driver = ConversationDriver::from_config(
            &config,
            Arc::new(ScriptedProvider::single_text("ok")),
            Arc::new(ToolRegistry::new(notifier)),
            persona(),
        );
        assert_eq!(driver.model(), config.model);
        assert_eq!(driver.max_iterations, config.agent.max_iterations);
        assert_eq!(driver.model_timeout, Duration::from_secs(config.agent.model_timeout_secs));
        assert_eq!(driver.apology, config.agent.apology);
    }
}
