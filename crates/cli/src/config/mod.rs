//! Merge the config file with command line overrides

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

use runtests_core::{BackendConfig, HarnessConfig, config};

use crate::cli::Cli;

/// Interpreter used when neither the command line nor a config file names one
pub const DEFAULT_INTERPRETER: &str = "jsref";

/// Everything needed to construct the backend for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub interp: String,
    pub backend: BackendConfig,
    /// Config file the defaults were read from, if any
    pub source: Option<PathBuf>,
}

/// Load the config file (explicit `--config` or the nearest one) and apply
/// command line overrides on top of it
pub fn resolve(cli: &Cli) -> Result<ResolvedConfig> {
    let (source, file) = match &cli.config {
        Some(path) => {
            let file = config::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            (Some(path.clone()), file)
        }
        None => match config::load_config()? {
            Some((path, file)) => (Some(path), file),
            None => (None, HarnessConfig::default()),
        },
    };

    if let Some(path) = &source {
        debug!("Using config file {}", path.display());
    }

    let HarnessConfig { interp, backend } = file;
    let interp = cli
        .interp
        .clone()
        .or(interp)
        .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string());

    Ok(ResolvedConfig {
        interp,
        backend: apply_overrides(cli, backend),
        source,
    })
}

fn apply_overrides(cli: &Cli, mut backend: BackendConfig) -> BackendConfig {
    if let Some(path) = &cli.interp_path {
        backend.interp_path = Some(path.clone());
    }
    if let Some(version) = &cli.interp_version {
        backend.interp_version = Some(version.clone());
    }
    if let Some(timeout) = cli.timeout {
        backend.timeout = timeout;
    }

    backend.jsonparser |= cli.jsref.jsonparser;
    backend.no_parasite |= cli.jsref.no_parasite;
    if let Some(parser) = &cli.jsref.parser {
        backend.parser = Some(parser.clone());
    }

    backend.stats |= cli.jsil.stats;
    backend.simp |= cli.jsil.simp;

    if let Some(prelude) = &cli.prelude.test_prelude {
        backend.test_prelude = Some(prelude.clone());
    }
    if let Some(root) = &cli.prelude.support_root {
        backend.support_root = Some(root.clone());
    }

    backend
}
