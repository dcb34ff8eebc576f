//! Orchestration Loop
//!
//! Alternates between asking the model and running the tools it requests,
//! until the model answers in plain text or a budget runs out.
//!
//! ```text
//!            ┌──────────────── tool results appended ───────────────┐
//!            v                                                      │
//!   user ─▶ AwaitingModel ── tool calls ──▶ ExecutingTools ─────────┘
//!            │    │
//!            │    └── text ──▶ Done
//!            └── adapter error / step limit / deadline ──▶ Failed
//! ```
//!
//! Tool failures never end a run: they are written into the transcript as
//! tool results so the model can react. Adapter failures and budget
//! exhaustion end the run with a typed error, leaving a consistent
//! transcript behind.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::{Instant, timeout_at};

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message};
use crate::provider::{
    Completion, CompletionRequest, GenerationOptions, LlmProvider, ModelTurn, ToolChoice,
};
use crate::registry::ToolRegistry;
use crate::tool::{ParameterSchema, ToolCallRequest, ToolDescriptor, ToolHandler};

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";
pub const DEFAULT_MAX_STEPS: usize = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

// Stand-in deadline for budgets too large to add to the clock
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Agent name, used in logs
    pub name: String,

    /// System prompt seeding every conversation
    pub system_prompt: String,

    /// Maximum model calls per run
    pub max_steps: usize,

    /// Wall-clock budget per run
    pub timeout: Duration,

    /// Generation options (model identifier etc.)
    pub generation: GenerationOptions,

    /// Tool selection policy while tools are registered
    pub tool_choice: ToolChoice,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "agent".into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_steps: DEFAULT_MAX_STEPS,
            timeout: DEFAULT_TIMEOUT,
            generation: GenerationOptions::default(),
            tool_choice: ToolChoice::Auto,
        }
    }
}

impl AgentConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(AgentError::Config("max_steps must be positive".into()));
        }
        if self.timeout.is_zero() {
            return Err(AgentError::Config("timeout must be positive".into()));
        }
        if self.generation.model.trim().is_empty() {
            return Err(AgentError::Config("model must not be empty".into()));
        }
        Ok(())
    }
}

/// Where the loop currently is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentState {
    /// No run started yet
    Idle,
    AwaitingModel,
    ExecutingTools,
    Done,
    Failed,
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: ToolRegistry,
    config: AgentConfig,
    conversation: Conversation,
    state: AgentState,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: ToolRegistry,
        config: AgentConfig,
    ) -> Result<Self> {
        config.validate()?;
        let conversation = Conversation::with_system_prompt(config.system_prompt.clone());

        Ok(Self {
            provider,
            tools,
            config,
            conversation,
            state: AgentState::Idle,
        })
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>) -> Result<Self> {
        Self::new(provider, ToolRegistry::new(), AgentConfig::default())
    }

    /// Register a descriptor, typically built with
    /// [`ToolBuilder`](crate::introspect::ToolBuilder)
    pub fn register_tool(&mut self, descriptor: ToolDescriptor) -> Result<()> {
        self.tools.register(descriptor)
    }

    /// Register a handler under an explicit name and description.
    ///
    /// Without `parameters` the tool advertises an empty argument object.
    pub fn register_tool_fn(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: ToolHandler,
        parameters: Option<Vec<ParameterSchema>>,
    ) -> Result<()> {
        self.tools.register_fn(name, description, handler, parameters)
    }

    /// Full transcript so far
    pub fn history(&self) -> &[Message] {
        self.conversation.messages()
    }

    /// Append a message to the transcript as-is
    pub fn add_message(&mut self, message: Message) {
        self.conversation.push(message);
    }

    /// Drop everything but the system prompt
    pub fn reset(&mut self) {
        self.conversation.reset();
        self.state = AgentState::Idle;
    }

    /// Run the loop on a user message
    pub async fn run(&mut self, input: impl Into<String>) -> Result<String> {
        let deadline = deadline_after(self.config.timeout);
        self.conversation.push(Message::user(input));

        let outcome = self.drive(deadline).await;

        match &outcome {
            Ok(_) => {
                self.state = AgentState::Done;
                tracing::info!(agent = %self.config.name, "Run finished");
            }
            Err(e) => {
                self.state = AgentState::Failed;
                tracing::warn!(agent = %self.config.name, kind = e.kind(), "Run failed: {}", e);
            }
        }

        outcome
    }

    /// Blocking variant of [`Agent::run`].
    ///
    /// Drives the same future on a fresh current-thread runtime, so it must
    /// not be called from within an async context.
    pub fn run_blocking(&mut self, input: impl Into<String>) -> Result<String> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.run(input))
    }

    async fn drive(&mut self, deadline: Instant) -> Result<String> {
        for step in 1..=self.config.max_steps {
            self.state = AgentState::AwaitingModel;
            let completion = self.call_model(step, deadline).await?;

            match completion.into_turn() {
                ModelTurn::Answer(text) => {
                    self.conversation.push(Message::assistant(text.clone()));
                    return Ok(text);
                }
                ModelTurn::ToolCalls { content, calls } => {
                    self.conversation
                        .push(Message::assistant_tool_calls(content, calls.clone()));
                    self.state = AgentState::ExecutingTools;
                    self.execute_tool_calls(step, &calls, deadline).await?;
                }
            }
        }

        Err(AgentError::StepLimitExceeded(self.config.max_steps))
    }

    async fn call_model(&self, step: usize, deadline: Instant) -> Result<Completion> {
        self.check_deadline(deadline)?;

        let tools = self.tools.export_schema();
        let tool_choice = if tools.is_empty() {
            ToolChoice::None
        } else {
            self.config.tool_choice.clone()
        };

        let request = CompletionRequest {
            messages: self.conversation.messages(),
            tools: &tools,
            tool_choice: &tool_choice,
            options: &self.config.generation,
        };

        tracing::debug!(
            agent = %self.config.name,
            provider = self.provider.name(),
            step,
            messages = request.messages.len(),
            tools = tools.len(),
            "Calling model"
        );

        match timeout_at(deadline, self.provider.complete(request)).await {
            Ok(Ok(completion)) => Ok(completion),
            Ok(Err(e @ AgentError::ModelCall(_))) => Err(e),
            Ok(Err(other)) => Err(AgentError::ModelCall(other.to_string())),
            Err(_) => Err(AgentError::Timeout(self.config.timeout)),
        }
    }

    async fn execute_tool_calls(
        &mut self,
        step: usize,
        calls: &[ToolCallRequest],
        deadline: Instant,
    ) -> Result<()> {
        for call in calls {
            if let Err(e) = self.check_deadline(deadline) {
                self.answer_pending_calls(&e);
                return Err(e);
            }

            tracing::debug!(
                agent = %self.config.name,
                step,
                tool = %call.name,
                call_id = %call.id,
                "Running tool call"
            );

            let outcome = match call.parse_arguments() {
                Ok(arguments) => {
                    match timeout_at(deadline, self.tools.execute(&call.name, arguments)).await {
                        Ok(result) => result,
                        Err(_) => {
                            let e = AgentError::Timeout(self.config.timeout);
                            self.answer_pending_calls(&e);
                            return Err(e);
                        }
                    }
                }
                Err(e) => Err(e),
            };

            let content = match outcome {
                Ok(value) => render_value(&value),
                Err(e) => {
                    tracing::warn!(tool = %call.name, call_id = %call.id, "Tool failed: {}", e);
                    render_error(&e)
                }
            };

            self.conversation.push(Message::tool(content, call.id.clone()));
        }

        Ok(())
    }

    /// Give every outstanding call of the current turn an error result
    fn answer_pending_calls(&mut self, err: &AgentError) {
        let pending: Vec<String> = self
            .conversation
            .unanswered_tool_calls()
            .into_iter()
            .map(|call| call.id.clone())
            .collect();

        for id in pending {
            self.conversation.push(Message::tool(render_error(err), id));
        }
    }

    fn check_deadline(&self, deadline: Instant) -> Result<()> {
        if Instant::now() >= deadline {
            Err(AgentError::Timeout(self.config.timeout))
        } else {
            Ok(())
        }
    }

    /// Get the tool registry
    pub const fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub const fn tools_mut(&mut self) -> &mut ToolRegistry {
        &mut self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub const fn state(&self) -> AgentState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }
}

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or_else(|| now + FAR_FUTURE)
}

/// Strings go to the model verbatim, everything else as JSON
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn render_error(err: &AgentError) -> String {
    json!({
        "error": {
            "kind": err.kind(),
            "message": err.to_string(),
        }
    })
    .to_string()
}

/// Builder for Agent configuration
#[derive(Default)]
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
    pending: Vec<ToolDescriptor>,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool(mut self, descriptor: ToolDescriptor) -> Self {
        self.pending.push(descriptor);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = Some(temp);
        self
    }

    #[must_use]
    pub const fn max_steps(mut self, max: usize) -> Self {
        self.config.max_steps = max;
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    #[must_use]
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.config.tool_choice = choice;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        let mut tools = self.tools;
        for descriptor in self.pending {
            tools.register(descriptor)?;
        }

        Agent::new(provider, tools, self.config)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::message::Role;
    use crate::provider::ScriptedProvider;
    use crate::tool::{Arguments, ParamType};

    fn calculator() -> ToolHandler {
        ToolHandler::sync(|args: Arguments| {
            let a = args.get("a").and_then(Value::as_i64).unwrap_or_default();
            let b = args.get("b").and_then(Value::as_i64).unwrap_or_default();
            match args.get("op").and_then(Value::as_str) {
                Some("add") => Ok(json!(a + b)),
                Some("mul") => Ok(json!(a * b)),
                other => Err(anyhow::anyhow!("unsupported operation: {other:?}")),
            }
        })
    }

    fn agent_with(provider: Arc<ScriptedProvider>, max_steps: usize) -> Agent {
        let mut agent = AgentBuilder::new()
            .provider(provider)
            .max_steps(max_steps)
            .build()
            .unwrap();
        agent
            .tools_mut()
            .register_fn(
                "calculator",
                "Basic arithmetic",
                calculator(),
                Some(vec![
                    ParameterSchema::required("a", ParamType::Integer),
                    ParameterSchema::required("op", ParamType::String),
                    ParameterSchema::required("b", ParamType::Integer),
                ]),
            )
            .unwrap();
        agent
    }

    fn call(id: &str, name: &str, arguments: Value) -> ToolCallRequest {
        ToolCallRequest::with_id(id, name, arguments.to_string())
    }

    fn roles(agent: &Agent) -> Vec<Role> {
        agent.history().iter().map(|m| m.role).collect()
    }

    #[tokio::test]
    async fn test_calculator_round_trip() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![call(
                "call_1",
                "calculator",
                json!({"a": 10, "op": "add", "b": 20}),
            )]),
            Completion::text("30"),
        ]));
        let mut agent = agent_with(Arc::clone(&provider), 10);

        let answer = agent.run("Calculate 10 + 20").await.unwrap();
        assert_eq!(answer, "30");
        assert_eq!(agent.state(), AgentState::Done);

        let history = agent.history();
        assert_eq!(
            roles(&agent),
            vec![Role::System, Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );
        assert_eq!(history[1].text(), "Calculate 10 + 20");
        assert_eq!(history[2].tool_calls[0].id, "call_1");
        assert_eq!(history[3].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(history[3].text(), "30");
        assert_eq!(history[4].text(), "30");

        // second request saw the tool result and the tool list
        let requests = provider.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages.len(), 4);
        assert_eq!(requests[0].tools[0].name, "calculator");
        assert_eq!(requests[0].tool_choice, ToolChoice::Auto);
    }

    #[tokio::test]
    async fn test_unknown_tool_hits_step_limit() {
        let provider = Arc::new(ScriptedProvider::repeating(Completion::tool_calls(vec![
            call("call_ghost", "ghost_tool", json!({})),
        ])));
        let mut agent = agent_with(Arc::clone(&provider), 3);

        let err = agent.run("Do the impossible").await.unwrap_err();
        assert!(matches!(err, AgentError::StepLimitExceeded(3)));
        assert_eq!(agent.state(), AgentState::Failed);
        assert_eq!(provider.call_count(), 3);

        let tool_messages: Vec<&Message> = agent
            .history()
            .iter()
            .filter(|m| m.role == Role::Tool)
            .collect();
        assert_eq!(tool_messages.len(), 3);
        for message in tool_messages {
            let body: Value = serde_json::from_str(message.text()).unwrap();
            assert_eq!(body["error"]["kind"], "tool_not_found");
        }
        assert!(agent.conversation.is_consistent());
    }

    #[tokio::test]
    async fn test_failing_tool_is_reported_to_model() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![call("call_1", "calculator", json!({"a": 1, "op": "pow", "b": 2}))]),
            Completion::text("I could not compute that"),
        ]));
        let mut agent = agent_with(Arc::clone(&provider), 5);

        let answer = agent.run("1 pow 2").await.unwrap();
        assert_eq!(answer, "I could not compute that");
        assert_eq!(provider.call_count(), 2);

        let tool_message = &agent.history()[3];
        let body: Value = serde_json::from_str(tool_message.text()).unwrap();
        assert_eq!(body["error"]["kind"], "tool_invocation");
        assert!(body["error"]["message"].as_str().unwrap().contains("unsupported operation"));
    }

    #[tokio::test]
    async fn test_multiple_calls_run_in_order() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![
                call("call_a", "calculator", json!({"a": 2, "op": "mul", "b": 3})),
                call("call_b", "calculator", json!({"a": 2, "op": "add", "b": 3})),
                ToolCallRequest::with_id("call_c", "calculator", "{oops"),
            ]),
            Completion::text("6 and 5"),
        ]));
        let mut agent = agent_with(provider, 5);

        agent.run("both please").await.unwrap();

        let results: Vec<(&str, &str)> = agent
            .history()
            .iter()
            .filter(|m| m.role == Role::Tool)
            .map(|m| (m.tool_call_id.as_deref().unwrap(), m.text()))
            .collect();
        assert_eq!(results[0], ("call_a", "6"));
        assert_eq!(results[1], ("call_b", "5"));
        assert_eq!(results[2].0, "call_c");
        assert!(results[2].1.contains("malformed arguments"));
    }

    #[tokio::test]
    async fn test_model_error_is_fatal() {
        let provider = Arc::new(
            ScriptedProvider::new([Completion::tool_calls(vec![call(
                "call_1",
                "calculator",
                json!({"a": 1, "op": "add", "b": 1}),
            )])])
            .then_fail("connection reset"),
        );
        let mut agent = agent_with(provider, 5);

        let err = agent.run("1 + 1").await.unwrap_err();
        assert!(matches!(err, AgentError::ModelCall(ref m) if m == "connection reset"));
        assert_eq!(agent.state(), AgentState::Failed);

        // transcript ends with the tool result, no partial answer
        assert_eq!(agent.history().last().unwrap().role, Role::Tool);
        assert!(agent.conversation.is_consistent());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_model_times_out() {
        let provider = Arc::new(
            ScriptedProvider::new([Completion::text("too late")])
                .with_delay(Duration::from_secs(10)),
        );
        let mut agent = AgentBuilder::new()
            .provider(provider)
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();

        let err = agent.run("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::Timeout(d) if d == Duration::from_secs(1)));
        assert_eq!(agent.state(), AgentState::Failed);
        assert_eq!(roles(&agent), vec![Role::System, Role::User]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_tool_times_out_with_consistent_transcript() {
        let provider = Arc::new(ScriptedProvider::new([Completion::tool_calls(vec![
            call("call_slow", "sleepy", json!({})),
            call("call_next", "calculator", json!({"a": 1, "op": "add", "b": 1})),
        ])]));
        let mut agent = agent_with(provider, 5);
        agent
            .register_tool_fn(
                "sleepy",
                "Takes forever",
                ToolHandler::asynchronous(|_| async {
                    tokio::time::sleep(Duration::from_secs(600)).await;
                    Ok(json!("finally"))
                }),
                None,
            )
            .unwrap();

        let err = agent.run("wait for it").await.unwrap_err();
        assert!(matches!(err, AgentError::Timeout(_)));

        let tool_messages: Vec<&Message> = agent
            .history()
            .iter()
            .filter(|m| m.role == Role::Tool)
            .collect();
        assert_eq!(tool_messages.len(), 2);
        assert!(tool_messages.iter().all(|m| m.text().contains("\"timeout\"")));
        assert!(agent.conversation.is_consistent());
    }

    #[tokio::test]
    async fn test_slow_sync_tool_finishes_then_times_out() {
        let provider = Arc::new(ScriptedProvider::new([Completion::tool_calls(vec![call(
            "call_1",
            "grind",
            json!({}),
        )])]));
        let mut agent = AgentBuilder::new()
            .provider(Arc::clone(&provider) as Arc<dyn LlmProvider>)
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        agent
            .register_tool_fn(
                "grind",
                "Blocks the thread",
                ToolHandler::sync(|_| {
                    std::thread::sleep(Duration::from_millis(150));
                    Ok(json!("done"))
                }),
                None,
            )
            .unwrap();

        let err = agent.run("go").await.unwrap_err();
        assert!(matches!(err, AgentError::Timeout(d) if d == Duration::from_millis(50)));
        assert_eq!(agent.state(), AgentState::Failed);

        // the blocking handler ran to completion and its result was kept
        assert_eq!(
            roles(&agent),
            vec![Role::System, Role::User, Role::Assistant, Role::Tool]
        );
        let last = agent.history().last().unwrap();
        assert_eq!(last.tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(last.text(), "done");
        assert!(agent.conversation.is_consistent());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_huge_timeout_runs_normally() {
        let provider = Arc::new(ScriptedProvider::new([Completion::text("ok")]));
        let mut agent = AgentBuilder::new()
            .provider(provider)
            .timeout(Duration::from_secs(u64::MAX))
            .build()
            .unwrap();

        assert_eq!(agent.run("hi").await.unwrap(), "ok");
        assert_eq!(agent.state(), AgentState::Done);
    }

    #[tokio::test]
    async fn test_register_tool_fn_advertises_parameters() {
        let provider = Arc::new(ScriptedProvider::new([Completion::text("ok")]));
        let mut agent = AgentBuilder::new().provider(provider).build().unwrap();
        agent
            .register_tool_fn(
                "echo",
                "Echo the text back",
                ToolHandler::sync(|args| Ok(args.get("text").cloned().unwrap_or_default())),
                Some(vec![ParameterSchema::required("text", ParamType::String)]),
            )
            .unwrap();

        let spec = &agent.tools().export_schema()[0];
        assert_eq!(spec.parameters["required"], json!(["text"]));
        assert_eq!(spec.parameters["properties"]["text"]["type"], "string");
    }

    #[tokio::test]
    async fn test_no_tools_means_tool_choice_none() {
        let provider = Arc::new(ScriptedProvider::new([Completion::text("hi there")]));
        let mut agent = Agent::with_defaults(Arc::clone(&provider) as Arc<dyn LlmProvider>).unwrap();

        assert_eq!(agent.run("hi").await.unwrap(), "hi there");
        let requests = provider.requests();
        assert!(requests[0].tools.is_empty());
        assert_eq!(requests[0].tool_choice, ToolChoice::None);
    }

    #[tokio::test]
    async fn test_add_message_round_trip() {
        let provider = Arc::new(ScriptedProvider::new([]));
        let mut agent = agent_with(provider, 1);

        let request = call("call_7", "calculator", json!({"a": 3, "op": "add", "b": 4}));
        let seeded = [
            Message::user("What is 3 + 4?").with_name("alice"),
            Message::assistant_tool_calls(None, vec![request]),
            Message::tool("7", "call_7"),
        ];
        for message in seeded.clone() {
            agent.add_message(message);
        }

        assert_eq!(&agent.history()[1..], &seeded[..]);
    }

    #[tokio::test]
    async fn test_reset_keeps_system_prompt() {
        let provider = Arc::new(ScriptedProvider::new([Completion::text("ok")]));
        let mut agent = agent_with(provider, 2);
        agent.run("hello").await.unwrap();

        agent.reset();
        assert_eq!(roles(&agent), vec![Role::System]);
        assert_eq!(agent.state(), AgentState::Idle);
    }

    #[test]
    fn test_run_blocking() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![call("call_1", "calculator", json!({"a": 4, "op": "mul", "b": 5}))]),
            Completion::text("20"),
        ]));
        let mut agent = agent_with(provider, 3);
        assert_eq!(agent.run_blocking("4 * 5").unwrap(), "20");
    }

    #[test]
    fn test_builder_validation() {
        let err = AgentBuilder::new().build().err().unwrap();
        assert!(matches!(err, AgentError::Config(_)));

        let provider = Arc::new(ScriptedProvider::new([]));
        let err = AgentBuilder::new()
            .provider(provider.clone())
            .max_steps(0)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::Config(_)));

        let err = AgentBuilder::new()
            .provider(provider)
            .timeout(Duration::ZERO)
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, AgentError::Config(_)));
    }

    #[test]
    fn test_builder_defaults() {
        let agent = AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::new([])))
            .name("helper")
            .model("llama3.2")
            .build()
            .unwrap();

        assert_eq!(agent.name(), "helper");
        assert_eq!(agent.config().max_steps, 10);
        assert_eq!(agent.config().timeout, Duration::from_secs(300));
        assert_eq!(agent.config().generation.model, "llama3.2");
        assert_eq!(agent.history()[0].text(), DEFAULT_SYSTEM_PROMPT);
        assert_eq!(agent.state(), AgentState::Idle);
    }
}
