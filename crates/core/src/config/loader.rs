//! Config file discovery and loading

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::BackendConfig;
use crate::error::{Error, Result};

/// File name searched for in the working directory and its parents
pub const CONFIG_FILE_NAME: &str = ".runtests.json";

/// Contents of a `.runtests.json` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Default interpreter name
    pub interp: Option<String>,
    pub backend: BackendConfig,
}

/// Load configuration from the nearest config file, if any
pub fn load_config() -> Result<Option<(PathBuf, HarnessConfig)>> {
    let cwd = std::env::current_dir()?;
    match find_config_file(&cwd) {
        Some(path) => {
            let config = load_from_path(&path)?;
            Ok(Some((path, config)))
        }
        None => Ok(None),
    }
}

/// Load configuration from a specific path
pub fn load_from_path(path: &Path) -> Result<HarnessConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config {}: {}", path.display(), e))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse config {}: {}", path.display(), e)))
}

/// Find the config file in `start` or its parent directories
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current_dir = start.to_path_buf();

    loop {
        let candidate = current_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("Found config file: {}", candidate.display());
            return Some(candidate);
        }

        // Move to parent directory
        if !current_dir.pop() {
            break;
        }
    }

    None
}
