//! Tool System
//!
//! Tool descriptors, handlers and the wire types exchanged with the model.
//! Tools are registered at runtime and invoked by the orchestration loop.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{AgentError, Result};

/// Named arguments passed to a tool handler
pub type Arguments = Map<String, Value>;

/// Tool call request from the model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Correlation token assigned by the adapter
    pub id: String,

    /// Tool identifier
    pub name: String,

    /// Raw serialized JSON arguments, as sent by the model
    pub arguments: String,
}

impl ToolCallRequest {
    /// Create a request with a generated call ID
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self::with_id(
            format!("call_{}", uuid::Uuid::new_v4().simple()),
            name,
            arguments,
        )
    }

    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Deserialize the raw arguments into a named-argument map.
    ///
    /// An empty payload means "no arguments". Anything that is not a JSON
    /// object is reported as an invocation failure of this tool.
    pub fn parse_arguments(&self) -> Result<Arguments> {
        if self.arguments.trim().is_empty() {
            return Ok(Arguments::new());
        }

        match serde_json::from_str::<Value>(&self.arguments) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(AgentError::invocation(
                &self.name,
                format!("arguments must be a JSON object, got {other}"),
            )),
            Err(e) => Err(AgentError::invocation(
                &self.name,
                format!("malformed arguments: {e}"),
            )),
        }
    }
}

/// Schema type vocabulary for tool parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    /// Unconstrained; no `type` is emitted
    Any,
}

impl ParamType {
    /// JSON Schema `type` keyword, `None` for [`ParamType::Any`]
    pub const fn json_type(self) -> Option<&'static str> {
        match self {
            Self::String => Some("string"),
            Self::Integer => Some("integer"),
            Self::Number => Some("number"),
            Self::Boolean => Some("boolean"),
            Self::Object => Some("object"),
            Self::Array => Some("array"),
            Self::Any => None,
        }
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    #[serde(rename = "type")]
    pub param_type: ParamType,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

impl ParameterSchema {
    /// A required parameter
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: String::new(),
            required: true,
            default: None,
            enum_values: None,
        }
    }

    /// An optional parameter
    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type)
        }
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// JSON Schema fragment for this parameter
    pub fn to_json_schema(&self) -> Value {
        let mut property = Map::new();
        if let Some(ty) = self.param_type.json_type() {
            property.insert("type".into(), json!(ty));
        }
        if !self.description.is_empty() {
            property.insert("description".into(), json!(self.description));
        }
        if let Some(default) = &self.default {
            property.insert("default".into(), default.clone());
        }
        if let Some(values) = &self.enum_values {
            property.insert("enum".into(), Value::Array(values.clone()));
        }
        Value::Object(property)
    }
}

/// Build the `{type: object, properties, required}` schema for a parameter list
pub fn parameters_json_schema(parameters: &[ParameterSchema]) -> Value {
    let properties: Map<String, Value> = parameters
        .iter()
        .map(|p| (p.name.clone(), p.to_json_schema()))
        .collect();

    let required: Vec<&str> = parameters
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.as_str())
        .collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Tool metadata as authored (name, description, parameters)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

/// Provider-agnostic tool spec handed to the model adapter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON Schema object describing the accepted arguments
    pub parameters: Value,
}

pub type SyncHandler = Arc<dyn Fn(Arguments) -> anyhow::Result<Value> + Send + Sync>;
pub type AsyncHandler =
    Arc<dyn Fn(Arguments) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// A tool's callable, tagged by calling convention
#[derive(Clone)]
pub enum ToolHandler {
    /// Runs to completion on the calling task without yielding
    Sync(SyncHandler),
    /// Awaited; may suspend the run
    Async(AsyncHandler),
}

impl ToolHandler {
    pub fn sync<F>(f: F) -> Self
    where
        F: Fn(Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    pub fn asynchronous<F, Fut>(f: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self::Async(Arc::new(move |args| f(args).boxed()))
    }

    pub const fn is_asynchronous(&self) -> bool {
        matches!(self, Self::Async(_))
    }

    /// Invoke the handler. Both conventions look the same to the caller.
    pub async fn invoke(&self, arguments: Arguments) -> anyhow::Result<Value> {
        match self {
            Self::Sync(f) => f(arguments),
            Self::Async(f) => f(arguments).await,
        }
    }
}

impl std::fmt::Debug for ToolHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("ToolHandler::Sync"),
            Self::Async(_) => f.write_str("ToolHandler::Async"),
        }
    }
}

/// Everything the registry knows about one tool
#[derive(Clone, Debug)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterSchema>,
    pub handler: ToolHandler,
}

impl ToolDescriptor {
    pub fn new(schema: ToolSchema, handler: ToolHandler) -> Self {
        Self {
            name: schema.name,
            description: schema.description,
            parameters: schema.parameters,
            handler,
        }
    }

    /// Wrap a [`Tool`] implementation
    pub fn from_tool<T: Tool + 'static>(tool: T) -> Self {
        let schema = tool.schema();
        let tool = Arc::new(tool);
        let handler = ToolHandler::asynchronous(move |args| {
            let tool = Arc::clone(&tool);
            async move { tool.execute(args).await }
        });
        Self::new(schema, handler)
    }

    pub const fn is_asynchronous(&self) -> bool {
        self.handler.is_asynchronous()
    }

    /// Export in the provider-agnostic tool-spec format
    pub fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: parameters_json_schema(&self.parameters),
        }
    }
}

/// Tool trait - implement to add stateful capabilities.
///
/// Plain functions are usually easier to register through
/// [`ToolBuilder`](crate::introspect::ToolBuilder).
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments
    async fn execute(&self, arguments: Arguments) -> anyhow::Result<Value>;
}
