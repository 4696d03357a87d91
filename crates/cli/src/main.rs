use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use runtests::{Cli, commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG; otherwise only warnings by default
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if cli.list_interpreters {
        commands::list_command();
        return Ok(ExitCode::SUCCESS);
    }

    let passed = commands::run_command(&cli)?;
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
