//! Interpreter backends
//!
//! A backend wraps one external interpreter executable: where it lives, how
//! to ask it for its version, whether its inputs must be staged, and how to
//! turn a test case into a command line.

pub mod generic;
pub mod jsil;
pub mod jsref;
pub mod lambdas5;
pub mod mljsref;
pub mod nodejs;
pub mod spidermonkey;
pub mod staging;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use tracing::warn;

use crate::{
    config::{BackendConfig, BackendOption},
    error::{Error, Result},
    types::{Status, TestCase},
    utils::WorkdirGuard,
    version::query_version,
};

pub use generic::Generic;
pub use jsil::Jsil;
pub use jsref::JsRef;
pub use lambdas5::LambdaS5;
pub use mljsref::MlJsRef;
pub use nodejs::NodeJs;
pub use spidermonkey::SpiderMonkey;
pub use staging::{InputStager, StagingSession};

/// Core trait that every interpreter backend implements
pub trait Backend: Send + Sync + fmt::Debug {
    /// Registry name of this backend (lowercase)
    fn name(&self) -> &'static str;

    /// Human-readable interpreter name used in reports
    fn display_name(&self) -> String;

    /// State shared by all backends
    fn base(&self) -> &BackendBase;

    /// Resolved interpreter executable
    fn path(&self) -> &Path {
        self.base().path()
    }

    /// Interpreter version, resolved on first use
    fn version(&self) -> String {
        self.base().version()
    }

    /// Effective timeout; `None` waits forever
    fn timeout(&self) -> Option<Duration> {
        self.base().timeout()
    }

    fn trashes_input(&self) -> bool {
        self.base().stager().is_staging()
    }

    fn scratch_dir(&self) -> Option<&Path> {
        self.base().stager().scratch_dir()
    }

    /// Directory the interpreter must be run from, if it cares
    fn working_dir(&self) -> Option<PathBuf> {
        None
    }

    /// Acquire process-global state needed for one execution.
    ///
    /// Teardown happens when the returned guard is dropped.
    fn setup(&self) -> Result<SetupGuard> {
        match self.working_dir() {
            Some(dir) => SetupGuard::workdir(&dir),
            None => Ok(SetupGuard::none()),
        }
    }

    /// Stage the inputs of one command line
    fn staging(&self) -> StagingSession<'_> {
        self.base().stager().session()
    }

    /// Build the full command line for `testcase`
    fn build_args(&self, testcase: &dyn TestCase) -> Result<Vec<String>> {
        let file = self.staging().stage_arg(testcase.realpath())?;
        Ok(vec![path_arg(self.path()), file])
    }

    /// Classify an exit status. Signals and unknown codes are aborts.
    fn determine_result(&self, exit_code: Option<i32>) -> Status {
        self.base().classify(exit_code)
    }
}

/// Fixed properties of a backend variant
#[derive(Debug, Clone, Copy)]
pub struct BackendDefaults {
    pub name: &'static str,
    /// Executable used when no path is configured
    pub path: Option<&'static str>,
    pub pass_code: i32,
    pub fail_code: i32,
    pub trashes_input: bool,
    /// Variant-specific options the backend honors
    pub options: &'static [BackendOption],
}

impl BackendDefaults {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            path: None,
            pass_code: 0,
            fail_code: 1,
            trashes_input: false,
            options: &[],
        }
    }
}

/// State and behavior common to every backend
pub struct BackendBase {
    path: PathBuf,
    version_override: Option<String>,
    version: OnceLock<String>,
    timeout: Option<Duration>,
    pass_code: i32,
    fail_code: i32,
    stager: InputStager,
    run_lock: Mutex<()>,
}

impl BackendBase {
    /// Validate `config` against `defaults` and build the shared state
    pub fn new(config: &BackendConfig, defaults: BackendDefaults) -> Result<Self> {
        let path = match (config.explicit_path(), defaults.path) {
            (Some(path), _) => path.clone(),
            (None, Some(default)) => PathBuf::from(default),
            (None, None) => {
                return Err(Error::Config(format!(
                    "interpreter '{}' requires an explicit interpreter path",
                    defaults.name
                )));
            }
        };

        for option in config.enabled_options() {
            if !defaults.options.contains(&option) {
                warn!(
                    "Option '{}' is ignored by the {} interpreter",
                    option.name(),
                    defaults.name
                );
            }
        }

        let (pass_code, fail_code) = config.exit_codes(defaults.pass_code, defaults.fail_code)?;

        Ok(Self {
            path,
            version_override: config.explicit_version().map(str::to_string),
            version: OnceLock::new(),
            timeout: config.timeout_duration(),
            pass_code,
            fail_code,
            stager: InputStager::new(defaults.trashes_input)?,
            run_lock: Mutex::new(()),
        })
    }

    /// Replace the resolved path, e.g. to make it absolute
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn version(&self) -> String {
        self.version
            .get_or_init(|| match &self.version_override {
                Some(version) => version.clone(),
                None => query_version(&self.path),
            })
            .clone()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn pass_code(&self) -> i32 {
        self.pass_code
    }

    pub fn fail_code(&self) -> i32 {
        self.fail_code
    }

    pub fn stager(&self) -> &InputStager {
        &self.stager
    }

    /// Serialize executions on this backend instance
    pub fn lock_execution(&self) -> MutexGuard<'_, ()> {
        self.run_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn classify(&self, exit_code: Option<i32>) -> Status {
        match exit_code {
            Some(code) if code == self.pass_code => Status::Pass,
            Some(code) if code == self.fail_code => Status::Fail,
            _ => Status::Abort,
        }
    }
}

impl fmt::Debug for BackendBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendBase")
            .field("path", &self.path)
            .field("version_override", &self.version_override)
            .field("timeout", &self.timeout)
            .field("pass_code", &self.pass_code)
            .field("fail_code", &self.fail_code)
            .field("scratch_dir", &self.stager.scratch_dir())
            .finish()
    }
}

/// Scoped acquisition returned by [`Backend::setup`]; dropping it tears down
#[derive(Debug)]
#[must_use = "dropping the guard immediately tears the setup down"]
pub struct SetupGuard {
    workdir: Option<WorkdirGuard>,
}

impl SetupGuard {
    pub fn none() -> Self {
        Self { workdir: None }
    }

    /// Run inside `dir` until the guard is dropped
    pub fn workdir(dir: &Path) -> Result<Self> {
        Ok(Self {
            workdir: Some(WorkdirGuard::enter(dir)?),
        })
    }

    pub fn changes_directory(&self) -> bool {
        self.workdir.is_some()
    }

    /// Explicit teardown, equivalent to dropping the guard
    pub fn teardown(self) {}
}

/// Render a path as a command-line argument
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
