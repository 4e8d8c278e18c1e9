//! Tool system for function calling.

pub mod arguments;
pub mod search;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use search::{tavily_search_tool, TAVILY_SEARCH_TOOL};
pub use tool::{AgentTool, Tool, ToolExecutionContext};
pub use types::AgentToolParameters;
pub use validation::validate_arguments;
