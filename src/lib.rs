//! Web-search-augmented question answering.
//!
//! Wires a fixed-configuration Tavily search client into a small agent graph:
//! a model node that calls an OpenAI-compatible chat model with the search
//! tool bound, and a tools node that runs the searches the model asks for.
//! Conversation state is checkpointed in memory per thread.
//!
//! # Quick Start
//!
//! ```no_run
//! use tavily_agent::agent::{get_agent, InvokeConfig, DEFAULT_AGENT};
//! use tavily_agent::config::AgentConfig;
//!
//! # async fn example() -> tavily_agent::error::Result<()> {
//! let config = AgentConfig::from_env();
//! let agent = get_agent(DEFAULT_AGENT, &config)?;
//! let state = agent
//!     .ask("What changed in Rust 1.80?", &InvokeConfig::fresh())
//!     .await?;
//! println!("{}", state.final_answer().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod search;
pub mod tools;
pub mod types;
