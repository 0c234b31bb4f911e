use std::process::ExitCode;

use bam_design::cli::{self, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over the debug/quiet flags
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Prepare(args) => cli::prepare::run(args),
        Commands::Link(args) => cli::link::run(args, cli.format),
        Commands::Refs(args) => cli::refs::run(args, cli.format),
    };

    match result {
        Ok(()) => {
            tracing::debug!("Process over");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
