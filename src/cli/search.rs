//! `search`: query Tavily directly and have a model summarize the hits.

use std::io::Write;

use crate::agent::prompt::{summary_request, SUMMARY_PROMPT};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::models::LanguageModel;
use crate::provider::{self, ModelProvider, ProviderRequest};
use crate::search::TavilySearch;
use crate::types::{GenerationSettings, ModelMessage};

use super::{separator, SearchArgs};

/// Run the `search` driver with clients built from `config`.
pub async fn handle_search(args: &SearchArgs, config: &AgentConfig, out: &mut dyn Write) -> Result<()> {
    let search = TavilySearch::from_config(config)?;
    let model: LanguageModel = args.model.parse()?;
    let provider = provider::create_provider(&model, config)?;
    run_search(&search, provider.as_ref(), &args.query, out).await
}

/// Search, print the raw results, then print the model's summary.
pub async fn run_search(
    search: &TavilySearch,
    provider: &dyn ModelProvider,
    query: &str,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "Searching for: {query}")?;
    writeln!(out, "{}", separator())?;

    let results = search.search(query).await?;
    let rendered = serde_json::to_string_pretty(&results)?;
    writeln!(out, "Search Results:")?;
    writeln!(out, "{}", separator())?;
    writeln!(out, "{rendered}")?;
    writeln!(out, "{}", separator())?;

    writeln!(out, "Generating summary...")?;
    writeln!(out, "{}", separator())?;
    let request = ProviderRequest {
        messages: vec![
            ModelMessage::system(SUMMARY_PROMPT),
            ModelMessage::user(summary_request(query, &rendered)),
        ],
        settings: GenerationSettings::default(),
        tools: None,
    };
    let response = provider.generate_text(&request).await?;

    writeln!(out, "Summary:")?;
    writeln!(out, "{}", separator())?;
    writeln!(out, "{}", response.text)?;
    Ok(())
}
