//! Service Kit - Agent Tools
//!
//! Sync tools are plain functions wrapped by `ToolBuilder`; `multi_edit`
//! implements `agent_core::Tool` directly.

mod calculator;
mod file_ops;
mod search;
mod weather;

pub use calculator::{calculator, calculator_tool};
pub use file_ops::{Edit, FileOpError, MultiEditTool, multi_edit, read_file, read_file_tool};
pub use search::{search_web, search_web_tool};
pub use weather::{get_weather, weather_tool};
