//! relpub - release publisher CLI

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use relpub_cli::cmd;
use relpub_cli::ui::Output;
use relpub_cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new();

    let result = match cli.command {
        Commands::Dist(args) => cmd::dist::dist(*args, cli.dry_run, &output).await,
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{err:?}");
            output.failure(&err);
            ExitCode::FAILURE
        }
    }
}
