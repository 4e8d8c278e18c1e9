//! `chat`: ask the search agent a question and a follow-up on one thread.

use std::io::Write;

use crate::agent::{get_agent, AgentState, InvokeConfig, SearchAgent};
use crate::config::AgentConfig;
use crate::error::Result;

use super::{separator, ChatArgs};

/// Run the `chat` driver with the agent named in `args`.
pub async fn handle_chat(args: &ChatArgs, config: &AgentConfig, out: &mut dyn Write) -> Result<()> {
    let agent = get_agent(&args.agent, config)?;
    run_chat(&agent, args, out).await
}

/// Send the query (and optionally the follow-up) and print every message of
/// the thread after each turn.
pub async fn run_chat(agent: &SearchAgent, args: &ChatArgs, out: &mut dyn Write) -> Result<()> {
    let mut invoke = match args.thread_id {
        Some(ref id) => InvokeConfig::new(id.clone()),
        None => InvokeConfig::fresh(),
    };
    invoke.model = args.model.clone();

    writeln!(out, "Sending query: {}", args.query)?;
    writeln!(out, "{}", separator())?;
    let state = agent.ask(args.query.clone(), &invoke).await?;
    writeln!(out, "Agent response:")?;
    writeln!(out, "{}", separator())?;
    print_messages(&state, out)?;

    if args.no_follow_up {
        return Ok(());
    }

    writeln!(out, "\nSending follow-up query: {}", args.follow_up)?;
    writeln!(out, "{}", separator())?;
    let state = agent.ask(args.follow_up.clone(), &invoke).await?;
    writeln!(out, "Agent response to follow-up:")?;
    writeln!(out, "{}", separator())?;
    print_messages(&state, out)?;
    Ok(())
}

fn print_messages(state: &AgentState, out: &mut dyn Write) -> Result<()> {
    for message in &state.messages {
        writeln!(out, "{}", message.pretty())?;
    }
    Ok(())
}
