use serde::Serialize;
use std::path::Path;

use runtests_core::{Status, TestResult};

/// One line of `--json` output
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub file: &'a Path,
    pub interpreter: &'a str,
    pub version: &'a str,
    #[serde(flatten)]
    pub result: &'a TestResult,
}

/// A `--json` line for a test the harness could not run at all
#[derive(Debug, Serialize)]
pub struct JsonError<'a> {
    pub file: &'a Path,
    pub interpreter: &'a str,
    pub error: String,
}

fn status_marker(status: Status) -> &'static str {
    match status {
        Status::Pass => "✅",
        Status::Fail => "❌",
        Status::Abort => "💥",
        Status::Timeout => "⏱️",
    }
}

/// Human readable summary line for one result
pub fn format_result_line(file: &Path, result: &TestResult) -> String {
    let mut line = format!(
        "{} {:<7} {} ({:.3}s",
        status_marker(result.status),
        result.status,
        file.display(),
        result.duration.as_secs_f64()
    );
    match result.exit_code {
        Some(code) if result.status != Status::Pass => line.push_str(&format!(", exit code {code}")),
        None if result.status == Status::Abort => line.push_str(", killed by signal"),
        _ => {}
    }
    line.push(')');
    line
}

/// Captured output, indented under the summary line
pub fn format_output(result: &TestResult) -> String {
    let mut out = String::new();
    for (label, text) in [("stdout", &result.stdout), ("stderr", &result.stderr)] {
        if text.trim().is_empty() {
            continue;
        }
        out.push_str(&format!("   {label}:\n"));
        for line in text.lines() {
            out.push_str(&format!("     {line}\n"));
        }
    }
    out
}

/// Final tally printed after all tests ran
pub fn format_summary(results: &[Status], errors: usize) -> String {
    let count = |status: Status| results.iter().filter(|s| **s == status).count();
    let mut summary = format!(
        "{} passed, {} failed, {} aborted, {} timed out",
        count(Status::Pass),
        count(Status::Fail),
        count(Status::Abort),
        count(Status::Timeout)
    );
    if errors > 0 {
        summary.push_str(&format!(", {errors} could not be run"));
    }
    summary
}
