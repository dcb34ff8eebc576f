//! # agent-core
//!
//! Tool registry and tool-calling orchestration loop, independent of any
//! particular model backend.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Orchestra-  │  │    Tool     │  │   LlmProvider       │  │
//! │  │ tion Loop   │──│  Registry   │  │   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │         │                                    ▲               │
//! │         └──────── Conversation ──────────────┘               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the loop unaware of which backend answers;
//! credentials and endpoints belong to the provider implementation.

pub mod error;
pub mod introspect;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod registry;
pub mod tool;

pub use error::{AgentError, Result};
pub use introspect::{ToolBuilder, derive_parameters};
pub use message::{Conversation, Message, Role};
pub use provider::{
    Completion, CompletionRequest, GenerationOptions, LlmProvider, ModelTurn, ScriptedProvider,
    ToolChoice,
};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, AgentState};
pub use registry::ToolRegistry;
pub use tool::{
    Arguments, ParamType, ParameterSchema, Tool, ToolCallRequest, ToolDescriptor, ToolHandler,
    ToolSchema, ToolSpec,
};
