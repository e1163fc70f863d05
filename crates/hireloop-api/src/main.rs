//! hireloop CLI and HTTP entry point.
//!
//! Binary name: `hireloop`
//!
//! Parses CLI arguments, initializes tracing and application state, then
//! dispatches to the command handler or starts the HTTP server.

mod cli;
mod http;
mod runner;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,hireloop=debug",
        _ => "trace",
    };
    hireloop_observe::init_tracing(filter, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    hireloop_observe::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "hireloop", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::Serve { port, host } => cli::serve::serve(state, &host, port).await?,
        Commands::Admin { action } => cli::admin::run_admin(&state, action, cli.json).await?,
        Commands::Interview { timeout } => {
            cli::interview::run_interview(&state, timeout, cli.json).await?
        }
        Commands::Show { key } => cli::show::show_conversation(&state, &key, cli.json).await?,
        Commands::Welcome => cli::welcome::print_welcome(&state, cli.json)?,
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
