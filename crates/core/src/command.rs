//! Printable form of an interpreter invocation

use std::path::PathBuf;

use crate::{backends::Backend, error::Result, runner::ProcessRunner, types::TestCase};

/// A fully built interpreter command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterCommand {
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl InterpreterCommand {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            working_dir: None,
        }
    }

    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = Some(dir);
        self
    }

    /// The command a backend would run for `testcase`
    pub fn for_test(backend: &dyn Backend, testcase: &dyn TestCase) -> Result<Self> {
        let args = ProcessRunner::new().command_line(backend, testcase)?;
        let command = Self::new(args);
        Ok(match backend.working_dir() {
            Some(dir) => command.with_working_dir(dir),
            None => command,
        })
    }

    pub fn to_shell_command(&self) -> String {
        let mut cmd = String::new();
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                cmd.push(' ');
            }
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('\'') {
                cmd.push_str(&format!("'{}'", arg.replace('\'', r"'\''")));
            } else {
                cmd.push_str(arg);
            }
        }
        cmd
    }
}
