//! Named agents available to the drivers.

use crate::config::AgentConfig;
use crate::error::{AgentError, Result};
use crate::search::TavilySearch;
use crate::tools::tavily_search_tool;

use super::runtime::SearchAgent;

/// Key of the web-search agent.
pub const TAVILY_SEARCH_AGENT: &str = "tavily-search-agent";

/// Agent used when none is named.
pub const DEFAULT_AGENT: &str = TAVILY_SEARCH_AGENT;

/// Registered agent keys with a one-line description each.
pub fn list_agents() -> Vec<(&'static str, &'static str)> {
    vec![(
        TAVILY_SEARCH_AGENT,
        "Answers questions, searching the web with Tavily when needed",
    )]
}

/// Build the agent registered under `name`.
pub fn get_agent(name: &str, config: &AgentConfig) -> Result<SearchAgent> {
    match name {
        TAVILY_SEARCH_AGENT => {
            let search = TavilySearch::from_config(config)?;
            Ok(SearchAgent::new(config.clone()).with_tool(tavily_search_tool(search)))
        }
        other => Err(AgentError::AgentNotFound(other.to_string())),
    }
}
