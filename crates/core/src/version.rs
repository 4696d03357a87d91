//! Version lookups for interpreters and for the harness checkout itself

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

/// Reported when an interpreter's version cannot be determined
pub const UNKNOWN_VERSION: &str = "Unknown version";

/// Ask an interpreter for its version by running `<path> --version`.
///
/// Any spawn failure or non-zero exit degrades to [`UNKNOWN_VERSION`].
pub fn query_version(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        return UNKNOWN_VERSION.to_string();
    }

    let output = Command::new(path)
        .arg("--version")
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output();

    match output {
        Ok(output) if output.status.success() => {
            String::from_utf8_lossy(&output.stdout).trim().to_string()
        }
        Ok(output) => {
            debug!(
                "{} --version exited with {}",
                path.display(),
                output.status
            );
            UNKNOWN_VERSION.to_string()
        }
        Err(e) => {
            debug!("Could not run {} --version: {}", path.display(), e);
            UNKNOWN_VERSION.to_string()
        }
    }
}

/// Commit hash of the git checkout containing `dir` (or the working directory).
///
/// Returns an empty string when there is no repository. Other failures also
/// return an empty string but are logged as warnings.
pub fn git_version(dir: Option<&Path>) -> String {
    let mut cmd = Command::new("git");
    cmd.args(["rev-parse", "HEAD"]).stdin(Stdio::null());
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let output = match cmd.output() {
        Ok(output) => output,
        Err(e) => {
            warn!("Failed to run git: {}", e);
            return String::new();
        }
    };

    if output.status.success() {
        return String::from_utf8_lossy(&output.stdout).trim().to_string();
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("not a git repository") {
        debug!("Not a git checkout, no harness version available");
    } else {
        warn!(
            "git rev-parse HEAD failed ({}): {}",
            output.status,
            stderr.trim()
        );
    }
    String::new()
}
