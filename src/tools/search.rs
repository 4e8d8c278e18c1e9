//! The `tavily_search` tool: exposes [`TavilySearch`] to the model.

use std::sync::Arc;

use tracing::debug;

use crate::error::AgentError;
use crate::search::{SearchOverrides, TavilySearch, TimeRange, Topic};
use crate::tools::arguments::ToolArguments;
use crate::tools::tool::{AgentTool, Tool, ToolExecutionContext};
use crate::tools::types::AgentToolParameters;

/// Name the model uses to call the search tool.
pub const TAVILY_SEARCH_TOOL: &str = "tavily_search";

const DESCRIPTION: &str = "A search engine optimized for comprehensive, accurate, and trusted \
results. Useful for answering questions about current events or facts you are unsure about. \
Returns relevant URLs with snippets and, when available, a short synthesized answer. \
Input should be a search query.";

/// Wrap a search client as a tool.
pub fn tavily_search_tool(search: TavilySearch) -> Arc<dyn Tool> {
    let search = Arc::new(search);
    Arc::new(AgentTool::new(
        TAVILY_SEARCH_TOOL,
        DESCRIPTION,
        AgentToolParameters::object()
            .string("query", "Search query to look up", true)
            .string_array(
                "include_domains",
                "Only return results from these domains",
                false,
            )
            .string_array(
                "exclude_domains",
                "Never return results from these domains",
                false,
            )
            .string_enum(
                "time_range",
                "Limit results to those published within this window",
                &["day", "week", "month", "year"],
                false,
            )
            .string_enum(
                "topic",
                "Search category",
                &["general", "news", "finance"],
                false,
            )
            .build(),
        move |args, ctx: ToolExecutionContext| {
            let search = Arc::clone(&search);
            async move {
                let query = args.get_str("query")?;
                let overrides = overrides_from(&args)?;
                debug!(query, thread_id = ?ctx.thread_id, "search tool invoked");

                let response = search
                    .search_with(query, &overrides)
                    .await
                    .map_err(|e| AgentError::tool(TAVILY_SEARCH_TOOL, e.to_string()))?;

                if response.results.is_empty() && response.answer.is_none() {
                    return Err(AgentError::tool(
                        TAVILY_SEARCH_TOOL,
                        format!(
                            "No search results found for '{query}'. Try a broader or \
                             differently worded query, or remove domain and time filters."
                        ),
                    ));
                }

                Ok(serde_json::to_value(&response)?)
            }
        },
    ))
}

fn overrides_from(args: &ToolArguments) -> Result<SearchOverrides, AgentError> {
    let time_range = args
        .get_str_opt("time_range")
        .map(|s| {
            s.parse::<TimeRange>()
                .map_err(|_| AgentError::InvalidArgument(format!("unknown time_range '{s}'")))
        })
        .transpose()?;
    let topic = args
        .get_str_opt("topic")
        .map(|s| {
            s.parse::<Topic>()
                .map_err(|_| AgentError::InvalidArgument(format!("unknown topic '{s}'")))
        })
        .transpose()?;

    Ok(SearchOverrides {
        include_domains: args.get_string_list("include_domains"),
        exclude_domains: args.get_string_list("exclude_domains"),
        time_range,
        topic,
    })
}
