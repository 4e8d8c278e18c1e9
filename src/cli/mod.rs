//! Command-line drivers for the search adapter and the search agent.

pub mod chat;
pub mod search;

use clap::{Parser, Subcommand};

use crate::agent::DEFAULT_AGENT;

/// Query used when none is given on the command line.
pub const DEFAULT_QUERY: &str = "What are the latest developments in AI in 2024?";

/// Follow-up sent on the same thread by `chat`.
pub const DEFAULT_FOLLOW_UP: &str = "Can you tell me more about AI safety regulations?";

/// Model used by `search` to summarize results.
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-3.5-turbo";

const SEPARATOR_WIDTH: usize = 50;

/// Tavily-backed search agent CLI
#[derive(Parser, Debug)]
#[command(name = "tavily-agent", version, about = "Web-search-augmented answers from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search with Tavily directly, then summarize the results with a model
    Search(SearchArgs),
    /// Ask the search agent a question, then a follow-up on the same thread
    Chat(ChatArgs),
}

/// Arguments for the `search` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Model used for the summary (format: provider:model or a bare OpenAI id)
    #[arg(short, long, default_value = DEFAULT_SUMMARY_MODEL)]
    pub model: String,

    /// Search query (positional)
    #[arg(default_value = DEFAULT_QUERY)]
    pub query: String,
}

/// Arguments for the `chat` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Registered agent to run
    #[arg(short, long, default_value = DEFAULT_AGENT)]
    pub agent: String,

    /// Model override (defaults to DEFAULT_MODEL or openai:gpt-4o-mini)
    #[arg(short, long, env = "DEFAULT_MODEL")]
    pub model: Option<String>,

    /// Conversation thread id (a random UUID when omitted)
    #[arg(long)]
    pub thread_id: Option<String>,

    /// Follow-up question sent on the same thread
    #[arg(long, default_value = DEFAULT_FOLLOW_UP)]
    pub follow_up: String,

    /// Skip the follow-up question
    #[arg(long)]
    pub no_follow_up: bool,

    /// Question (positional)
    #[arg(default_value = DEFAULT_QUERY)]
    pub query: String,
}

/// Line of dashes printed between sections.
pub fn separator() -> String {
    "-".repeat(SEPARATOR_WIDTH)
}
