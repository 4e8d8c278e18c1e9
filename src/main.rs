//! tavily-agent binary entry point.

use clap::Parser;
use tavily_agent::cli::{chat, search, Cli, Commands};
use tavily_agent::config::{AgentConfig, Credential};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Loads .env before clap reads env-backed flags.
    let config = AgentConfig::from_env();
    let cli = Cli::parse();

    if let Some(missing) = config.missing(&Credential::all()) {
        println!("{}", missing.diagnostic());
        std::process::exit(1);
    }

    let mut stdout = std::io::stdout();
    let result = match cli.command {
        Commands::Search(args) => search::handle_search(&args, &config, &mut stdout).await,
        Commands::Chat(args) => chat::handle_chat(&args, &config, &mut stdout).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
