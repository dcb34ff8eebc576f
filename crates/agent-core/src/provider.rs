//! LLM Provider Strategy Pattern
//!
//! Defines the boundary between the orchestration loop and a model backend.
//! An adapter receives the transcript plus the exported tool list and answers
//! with either final text or a list of tool-call requests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{CompletionRequest, LlmProvider};
//!
//! let completion = provider.complete(request).await?;
//! match completion.into_turn() {
//!     ModelTurn::Answer(text) => println!("{text}"),
//!     ModelTurn::ToolCalls { calls, .. } => { /* run tools */ }
//! }
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::tool::{ToolCallRequest, ToolSpec};

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gpt-4o-mini", "llama3.2")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Tool selection policy sent with a request
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// Model decides
    #[default]
    Auto,
    /// Tools must not be called
    None,
    /// Model must call the named tool
    Required(String),
}

/// Everything the adapter needs for one round-trip
#[derive(Clone, Copy, Debug)]
pub struct CompletionRequest<'a> {
    pub messages: &'a [Message],
    pub tools: &'a [ToolSpec],
    pub tool_choice: &'a ToolChoice,
    pub options: &'a GenerationOptions,
}

/// Response from an LLM completion
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text, if any
    pub content: Option<String>,

    /// Tool invocations requested by the model, in order
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRequest>,

    /// Model that generated this response
    #[serde(default)]
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,
}

impl Completion {
    /// A final textual answer
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: Some(FinishReason::Stop),
            ..Self::default()
        }
    }

    /// A turn requesting tools
    pub fn tool_calls(calls: Vec<ToolCallRequest>) -> Self {
        Self {
            tool_calls: calls,
            finish_reason: Some(FinishReason::ToolUse),
            ..Self::default()
        }
    }

    /// Interpret the completion for the orchestration loop
    pub fn into_turn(self) -> ModelTurn {
        if self.tool_calls.is_empty() {
            ModelTurn::Answer(self.content.unwrap_or_default())
        } else {
            ModelTurn::ToolCalls {
                content: self.content,
                calls: self.tool_calls,
            }
        }
    }
}

/// What the model asked for in one turn
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelTurn {
    Answer(String),
    ToolCalls {
        content: Option<String>,
        calls: Vec<ToolCallRequest>,
    },
}

/// Token usage statistics
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolUse,
    ContentFilter,
    Error,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends.
/// The agent works exclusively through this interface. Any failure should be
/// reported as [`AgentError::ModelCall`]; retries are the adapter's business.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Generate a completion for the transcript and tool list
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion>;
}

/// A request as seen by [`ScriptedProvider`]
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
    pub tool_choice: ToolChoice,
}

#[derive(Clone, Debug)]
enum Scripted {
    Reply(Completion),
    Fail(String),
}

/// Deterministic provider replaying canned completions, for tests and demos
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Option<Completion>,
    delay: Option<Duration>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    /// Replay the given completions in order, then fail
    pub fn new(replies: impl IntoIterator<Item = Completion>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().map(Scripted::Reply).collect()),
            ..Self::default()
        }
    }

    /// Answer every request with the same completion.
    ///
    /// Tool call IDs get a per-request suffix so they stay unique.
    pub fn repeating(reply: Completion) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::default()
        }
    }

    /// Queue an adapter failure after the scripted replies
    #[must_use]
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Scripted::Fail(message.into()));
        self
    }

    /// Sleep before answering each request
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn next_step(&self, request_no: usize) -> Scripted {
        let queued = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match (queued, &self.fallback) {
            (Some(step), _) => step,
            (None, Some(reply)) => {
                let mut reply = reply.clone();
                for call in &mut reply.tool_calls {
                    call.id = format!("{}_{request_no}", call.id);
                }
                Scripted::Reply(reply)
            }
            (None, None) => Scripted::Fail("script exhausted".into()),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion> {
        let request_no = {
            let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);
            requests.push(RecordedRequest {
                messages: request.messages.to_vec(),
                tools: request.tools.to_vec(),
                tool_choice: request.tool_choice.clone(),
            });
            requests.len()
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.next_step(request_no) {
            Scripted::Reply(mut completion) => {
                if completion.model.is_empty() {
                    completion.model.clone_from(&request.options.model);
                }
                Ok(completion)
            }
            Scripted::Fail(message) => Err(AgentError::ModelCall(message)),
        }
    }
}
