use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::outcome::TestResult;
use crate::timer::Timer;

/// Directive markers that pull in extra library code at run time
const INCLUDE_MARKERS: &[&str] = &["$INCLUDE(", "$include("];

/// What a backend needs to know about the test it is running.
///
/// Backends only read the path and the kind predicates; the runner drives
/// the timer hooks and writes the result exactly once per execution.
pub trait TestCase {
    /// Location of the source under test
    fn realpath(&self) -> &Path;

    /// Test from the LambdaS5 unit-test suite (needs pre/post wrappers)
    fn is_lambdas5_test(&self) -> bool;

    /// Test from the SpiderMonkey suite (needs the shell prelude)
    fn is_spidermonkey_test(&self) -> bool;

    /// Whether the test belongs to a named conformance suite with its own prelude
    fn is_conformance_test(&self) -> bool {
        self.is_lambdas5_test() || self.is_spidermonkey_test()
    }

    /// Whether the source uses an include directive
    fn uses_include(&self) -> bool;

    fn start_timer(&mut self) {}

    fn stop_timer(&mut self) {}

    fn set_result(&mut self, result: TestResult);
}

/// A test case backed by a single source file on disk
#[derive(Debug, Clone)]
pub struct SourceTestCase {
    path: PathBuf,
    lambdas5: bool,
    spidermonkey: bool,
    include: bool,
    timer: Timer,
    result: Option<TestResult>,
}

impl SourceTestCase {
    /// Create a test case, detecting its suite from the path and include
    /// usage from the file contents.
    ///
    /// Relative paths are made absolute so they survive backends that change
    /// the working directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = absolute(path.into());
        let lambdas5 = is_lambdas5_path(&path);
        let spidermonkey = !lambdas5 && has_component(&path, "SpiderMonkey");
        let include = detect_include(&path);

        debug!(
            "Test case {}: lambdas5={}, spidermonkey={}, include={}",
            path.display(),
            lambdas5,
            spidermonkey,
            include
        );

        Self {
            path,
            lambdas5,
            spidermonkey,
            include,
            timer: Timer::new(),
            result: None,
        }
    }

    /// Create a test case with every kind flag cleared, without reading the file.
    ///
    /// Relative paths are made absolute, as in [`SourceTestCase::new`].
    pub fn plain(path: impl Into<PathBuf>) -> Self {
        Self {
            path: absolute(path.into()),
            lambdas5: false,
            spidermonkey: false,
            include: false,
            timer: Timer::new(),
            result: None,
        }
    }

    pub fn with_lambdas5(mut self, value: bool) -> Self {
        self.lambdas5 = value;
        self
    }

    pub fn with_spidermonkey(mut self, value: bool) -> Self {
        self.spidermonkey = value;
        self
    }

    pub fn with_include(mut self, value: bool) -> Self {
        self.include = value;
        self
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn result(&self) -> Option<&TestResult> {
        self.result.as_ref()
    }

    pub fn take_result(&mut self) -> Option<TestResult> {
        self.result.take()
    }
}

impl TestCase for SourceTestCase {
    fn realpath(&self) -> &Path {
        &self.path
    }

    fn is_lambdas5_test(&self) -> bool {
        self.lambdas5
    }

    fn is_spidermonkey_test(&self) -> bool {
        self.spidermonkey
    }

    fn uses_include(&self) -> bool {
        self.include
    }

    fn start_timer(&mut self) {
        self.timer.start();
    }

    fn stop_timer(&mut self) {
        self.timer.stop();
    }

    fn set_result(&mut self, result: TestResult) {
        self.result = Some(result);
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

fn has_component(path: &Path, name: &str) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(part) if part == name))
}

/// LambdaS5 tests live under `.../LambdaS5/unit-tests/...`
fn is_lambdas5_path(path: &Path) -> bool {
    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    parts
        .windows(2)
        .any(|pair| pair[0] == "LambdaS5" && pair[1] == "unit-tests")
}

fn detect_include(path: &Path) -> bool {
    match std::fs::read(path) {
        Ok(bytes) => {
            let source = String::from_utf8_lossy(&bytes);
            INCLUDE_MARKERS.iter().any(|marker| source.contains(marker))
        }
        Err(e) => {
            debug!("Could not read {} for include detection: {}", path.display(), e);
            false
        }
    }
}
