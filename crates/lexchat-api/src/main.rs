//! lexchat binary: CLI and REST API entry point.

mod cli;
mod http;
mod state;

use clap::Parser;

use lexchat_infra::config::resolve_data_dir;
use lexchat_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use crate::cli::{Cli, Commands, KeyCommand};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let data_dir = resolve_data_dir();
    let output = cli.output_mode();

    match cli.command {
        Commands::Serve { port, host } => cli::serve::serve(data_dir, &host, port, output).await,
        Commands::Key { command } => match command {
            KeyCommand::Create { owner, name } => {
                cli::key::create_key(&data_dir, owner, &name, output).await
            }
        },
        Commands::History { owner, limit } => {
            cli::history::show_history(&data_dir, owner, limit, output).await
        }
        Commands::Config => cli::config::show_config(&data_dir, output).await,
    }
}
