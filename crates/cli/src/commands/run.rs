use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use runtests_core::{
    Backend, InterpreterCommand, ProcessRunner, SourceTestCase, Status, git_version,
};

use crate::{
    cli::Cli,
    config::resolve,
    display::{JsonError, JsonReport, format_output, format_result_line, format_summary},
};

/// Run every test file given on the command line.
///
/// Returns whether all of them passed.
pub fn run_command(cli: &Cli) -> Result<bool> {
    let resolved = resolve(cli)?;
    let backend = runtests_core::construct(&resolved.interp, &resolved.backend)
        .with_context(|| format!("Failed to set up the '{}' interpreter", resolved.interp))?;

    if cli.dry_run {
        return dry_run(backend.as_ref(), &cli.files);
    }

    let version = backend.version();
    info!(
        "Running {} test(s) with {} ({})",
        cli.files.len(),
        backend.display_name(),
        version
    );
    let revision = git_version(None);
    if !revision.is_empty() {
        debug!("Harness revision {}", revision);
    }

    let runner = ProcessRunner::new();
    let mut statuses = Vec::with_capacity(cli.files.len());
    let mut errors = 0;

    for file in &cli.files {
        let mut testcase = SourceTestCase::new(file);

        match runner.run(backend.as_ref(), &mut testcase) {
            Ok(result) => {
                if cli.json {
                    let report = JsonReport {
                        file,
                        interpreter: backend.name(),
                        version: &version,
                        result: &result,
                    };
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    println!("{}", format_result_line(file, &result));
                    if cli.verbose && !result.is_pass() {
                        print!("{}", format_output(&result));
                    }
                }
                statuses.push(result.status);
            }
            Err(e) => {
                errors += 1;
                debug!("Could not run {}: {}", file.display(), e);
                if cli.json {
                    let report = JsonError {
                        file,
                        interpreter: backend.name(),
                        error: e.to_string(),
                    };
                    println!("{}", serde_json::to_string(&report)?);
                } else {
                    eprintln!("⚠️  {}: {}", file.display(), e);
                }
            }
        }
    }

    if !cli.json {
        println!();
        println!("{}", format_summary(&statuses, errors));
    }

    Ok(errors == 0 && statuses.iter().all(|status| *status == Status::Pass))
}

fn dry_run(backend: &dyn Backend, files: &[PathBuf]) -> Result<bool> {
    for file in files {
        let testcase = SourceTestCase::new(file);
        let command = InterpreterCommand::for_test(backend, &testcase)
            .with_context(|| format!("Failed to build the command for {}", file.display()))?;

        println!("{}", command.to_shell_command());
        if let Some(dir) = &command.working_dir {
            println!("Working directory: {}", dir.display());
        }
    }
    Ok(true)
}
