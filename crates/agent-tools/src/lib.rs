//! # agent-tools
//!
//! Ready-made tools for the toy-agent loop.
//!
//! | Tool          | Kind  | Notes                                        |
//! |---------------|-------|----------------------------------------------|
//! | `calculator`  | sync  | add / subtract / multiply / divide           |
//! | `get_weather` | sync  | mocked city table                            |
//! | `search_web`  | async | mocked results, at most three                |
//! | `read_file`   | async | failures come back as text, not errors       |
//! | `multi_edit`  | async | atomic find/replace sequence on one file     |
//!
//! ```rust,ignore
//! let mut agent = AgentBuilder::new().provider(provider).build()?;
//! agent_tools::register_all(agent.tools_mut())?;
//! ```

pub mod svckit;

use agent_core::{Result, ToolDescriptor, ToolRegistry};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        MultiEditTool, calculator_tool, read_file_tool, search_web_tool, weather_tool,
    };
}

/// Descriptors for every bundled tool, in registration order
pub fn all_tools() -> Vec<ToolDescriptor> {
    vec![
        svckit::calculator_tool(),
        svckit::weather_tool(),
        svckit::search_web_tool(),
        svckit::read_file_tool(),
        ToolDescriptor::from_tool(svckit::MultiEditTool),
    ]
}

/// Register every bundled tool
pub fn register_all(registry: &mut ToolRegistry) -> Result<()> {
    for descriptor in all_tools() {
        registry.register(descriptor)?;
    }
    Ok(())
}
