mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Generate {
            connection,
            output,
            config,
            redact_all,
        } => commands::generate::handle(connection, output, config, redact_all).await,
        cli::Commands::Check { connection, config } => {
            commands::check::handle(connection, config).await
        }
    }
}
