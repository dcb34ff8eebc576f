//! Error Types

use std::time::Duration;

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool handler failed (including argument-shape mismatches)
    #[error("Tool {tool} execution error: {message}")]
    ToolInvocation { tool: String, message: String },

    /// Tool registration rejected
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Model adapter failure (network, malformed response, ...)
    #[error("Model call error: {0}")]
    ModelCall(String),

    /// Step budget exhausted in the orchestration loop
    #[error("Maximum steps ({0}) reached without a final answer")]
    StepLimitExceeded(usize),

    /// Wall-clock budget exhausted
    #[error("Run timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Build a tool invocation error from any displayable failure
    pub fn invocation(tool: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::ToolInvocation {
            tool: tool.into(),
            message: err.to_string(),
        }
    }

    /// Stable snake_case label, used in serialized tool errors and logs
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ToolNotFound(_) => "tool_not_found",
            Self::ToolInvocation { .. } => "tool_invocation",
            Self::ToolValidation(_) => "tool_validation",
            Self::ModelCall(_) => "model_call",
            Self::StepLimitExceeded(_) => "step_limit_exceeded",
            Self::Timeout(_) => "timeout",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }

    /// Whether the failure happened inside tool execution.
    ///
    /// Tool failures are fed back to the model; everything else ends the run.
    pub const fn is_tool_failure(&self) -> bool {
        matches!(
            self,
            Self::ToolNotFound(_) | Self::ToolInvocation { .. }
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::ToolInvocation { tool, message } => format!("Tool '{tool}' failed: {message}"),
            Self::ToolValidation(msg) => format!("Invalid tool definition: {msg}"),
            Self::ModelCall(msg) => format!("The AI service encountered an error: {msg}"),
            Self::StepLimitExceeded(_) => {
                "The request needed too many steps. Please try a simpler query.".into()
            }
            Self::Timeout(_) => "The request took too long to process.".into(),
            Self::Config(msg) => format!("Configuration problem: {msg}"),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
