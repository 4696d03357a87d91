//! Backend configuration
//!
//! One explicit record carries every option any backend understands. Each
//! backend picks the fields it uses and reports the rest as ignored.

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

pub use loader::{CONFIG_FILE_NAME, HarnessConfig, find_config_file, load_config, load_from_path};

/// Timeout applied when none is configured, in seconds
pub const DEFAULT_TIMEOUT_SECS: i64 = 540;

/// Options accepted when constructing a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Interpreter executable override
    pub interp_path: Option<PathBuf>,
    /// Version string override (skips `--version` probing)
    pub interp_version: Option<String>,
    /// Timeout in seconds, values below 1 mean unlimited
    pub timeout: i64,
    /// Exit status treated as a pass
    pub pass_code: Option<i32>,
    /// Exit status treated as a failure
    pub fail_code: Option<i32>,

    /// JSRef: use the JSON (Esprima) parser
    pub jsonparser: bool,
    /// JSRef: pass `-no-parasite`
    pub no_parasite: bool,
    /// JSRef: parser jar override
    pub parser: Option<PathBuf>,

    /// JSRef, MLJSRef, JSIL: primary test prelude override
    pub test_prelude: Option<PathBuf>,
    /// JSRef, MLJSRef, JSIL: directory the built-in prelude and parser
    /// paths are relative to (default: working directory)
    pub support_root: Option<PathBuf>,

    /// JSIL: collect statistics
    pub stats: bool,
    /// JSIL: simplify the intermediate language
    pub simp: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            interp_path: None,
            interp_version: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            pass_code: None,
            fail_code: None,
            jsonparser: false,
            no_parasite: false,
            parser: None,
            test_prelude: None,
            support_root: None,
            stats: false,
            simp: false,
        }
    }
}

/// Variant-specific options a backend may or may not understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOption {
    JsonParser,
    NoParasite,
    Parser,
    TestPrelude,
    SupportRoot,
    Stats,
    Simp,
}

impl BackendOption {
    pub fn name(self) -> &'static str {
        match self {
            BackendOption::JsonParser => "jsonparser",
            BackendOption::NoParasite => "no_parasite",
            BackendOption::Parser => "parser",
            BackendOption::TestPrelude => "test_prelude",
            BackendOption::SupportRoot => "support_root",
            BackendOption::Stats => "stats",
            BackendOption::Simp => "simp",
        }
    }
}

impl BackendConfig {
    /// The effective timeout; `None` means wait forever
    pub fn timeout_duration(&self) -> Option<Duration> {
        if self.timeout < 1 {
            None
        } else {
            Some(Duration::from_secs(self.timeout as u64))
        }
    }

    /// Explicit interpreter path, treating an empty path as unset
    pub fn explicit_path(&self) -> Option<&PathBuf> {
        self.interp_path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Explicit version string, treating an empty string as unset
    pub fn explicit_version(&self) -> Option<&str> {
        self.interp_version.as_deref().filter(|v| !v.is_empty())
    }

    /// Variant-specific options that are switched on in this config
    pub fn enabled_options(&self) -> Vec<BackendOption> {
        let mut options = Vec::new();
        if self.jsonparser {
            options.push(BackendOption::JsonParser);
        }
        if self.no_parasite {
            options.push(BackendOption::NoParasite);
        }
        if self.parser.is_some() {
            options.push(BackendOption::Parser);
        }
        if self.test_prelude.is_some() {
            options.push(BackendOption::TestPrelude);
        }
        if self.support_root.is_some() {
            options.push(BackendOption::SupportRoot);
        }
        if self.stats {
            options.push(BackendOption::Stats);
        }
        if self.simp {
            options.push(BackendOption::Simp);
        }
        options
    }

    /// Resolve a built-in support file against `support_root`
    pub fn support_file(&self, relative: &str) -> PathBuf {
        match &self.support_root {
            Some(root) => root.join(relative),
            None => PathBuf::from(relative),
        }
    }

    /// Resolve pass/fail codes against a backend's defaults
    pub fn exit_codes(&self, default_pass: i32, default_fail: i32) -> Result<(i32, i32)> {
        let pass = self.pass_code.unwrap_or(default_pass);
        let fail = self.fail_code.unwrap_or(default_fail);
        if pass == fail {
            return Err(Error::Config(format!(
                "pass code and fail code must differ (both are {pass})"
            )));
        }
        Ok((pass, fail))
    }
}
