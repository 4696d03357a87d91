//! Runs one test case against a backend and classifies the outcome

pub mod process;

use tracing::{debug, info};

use crate::{
    backends::Backend,
    error::Result,
    timer::Timer,
    types::{Status, TestCase, TestResult},
};

pub use process::{ProcessOutput, execute};

/// Executes test cases against interpreter backends.
///
/// Each call is blocking. Calls against the same backend instance are
/// serialized; directory-sensitive backends are additionally serialized
/// process-wide by their setup guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run `testcase` once and record the result on it.
    ///
    /// A timeout is reported as [`Status::Timeout`], not as an error. Errors
    /// are reserved for failures to set up, stage inputs or spawn.
    pub fn run(&self, backend: &dyn Backend, testcase: &mut dyn TestCase) -> Result<TestResult> {
        let _exclusive = backend.base().lock_execution();

        // Teardown runs when the guard drops, including on early return
        let guard = backend.setup()?;
        let argv = backend.build_args(testcase)?;
        debug!("Calling interpreter with the command: {:?}", argv);

        let mut timer = Timer::new();
        testcase.start_timer();
        timer.start();
        let output = execute(&argv, backend.timeout());
        timer.stop();
        testcase.stop_timer();

        guard.teardown();
        let output = output?;

        let status = if output.timed_out {
            Status::Timeout
        } else {
            backend.determine_result(output.exit_code)
        };

        let result = TestResult {
            status,
            exit_code: output.exit_code,
            stdout: output.stdout_string(),
            stderr: output.stderr_string(),
            duration: timer.duration(),
        };

        info!(
            "{}: {} (exit code {:?}, {:.3}s)",
            testcase.realpath().display(),
            result.status,
            result.exit_code,
            result.duration.as_secs_f64()
        );

        testcase.set_result(result.clone());
        Ok(result)
    }

    /// The command line `run` would execute, without running it
    pub fn command_line(&self, backend: &dyn Backend, testcase: &dyn TestCase) -> Result<Vec<String>> {
        let _exclusive = backend.base().lock_execution();
        backend.build_args(testcase)
    }
}
