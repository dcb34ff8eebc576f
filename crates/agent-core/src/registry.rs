//! Tool Registry
//!
//! Single source of truth for which tools exist and how to run them.
//! Registration order is preserved so exported tool lists are deterministic.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::tool::{Arguments, ParameterSchema, Tool, ToolDescriptor, ToolHandler, ToolSchema, ToolSpec};

/// Registry for available tools.
///
/// Re-registering a name replaces the previous descriptor in place
/// (last write wins, position unchanged).
#[derive(Clone, Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor
    pub fn register(&mut self, descriptor: ToolDescriptor) -> Result<()> {
        if descriptor.name.trim().is_empty() {
            return Err(AgentError::ToolValidation(
                "tool name must not be empty".into(),
            ));
        }

        if let Some(&pos) = self.index.get(&descriptor.name) {
            tracing::debug!(tool = %descriptor.name, "Replacing registered tool");
            self.tools[pos] = descriptor;
        } else {
            tracing::debug!(tool = %descriptor.name, "Registering tool");
            self.index.insert(descriptor.name.clone(), self.tools.len());
            self.tools.push(descriptor);
        }

        Ok(())
    }

    /// Register a handler under an explicit name and description.
    ///
    /// Without a parameter list the tool advertises an empty argument object.
    pub fn register_fn(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: ToolHandler,
        parameters: Option<Vec<ParameterSchema>>,
    ) -> Result<()> {
        let schema = ToolSchema {
            name: name.into(),
            description: description.into(),
            parameters: parameters.unwrap_or_default(),
        };
        self.register(ToolDescriptor::new(schema, handler))
    }

    /// Register a [`Tool`] implementation
    pub fn register_tool<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        self.register(ToolDescriptor::from_tool(tool))
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&pos| &self.tools[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tool names in registration order
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// Export every tool in the provider-agnostic format.
    ///
    /// Built from the current descriptors on each call.
    pub fn export_schema(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(ToolDescriptor::spec).collect()
    }

    /// Execute a tool by name.
    ///
    /// Arguments are passed through as-is; the parameter schema is advisory
    /// for the model and not checked here.
    pub async fn execute(&self, name: &str, arguments: Arguments) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        tracing::debug!(
            tool = %name,
            asynchronous = tool.is_asynchronous(),
            "Executing tool"
        );

        tool.handler
            .invoke(arguments)
            .await
            .map_err(|e| AgentError::invocation(name, format!("{e:#}")))
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
