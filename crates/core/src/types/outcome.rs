use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Classification of one interpreter execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
    Abort,
    Timeout,
}

impl Status {
    /// Numeric code used by the harness reports (PASS=0 .. TIMEOUT=3)
    pub fn code(self) -> u8 {
        match self {
            Status::Pass => 0,
            Status::Fail => 1,
            Status::Abort => 2,
            Status::Timeout => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Abort => "ABORT",
            Status::Timeout => "TIMEOUT",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of running one test case, produced fresh per execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub status: Status,
    /// `None` when the child was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }
}

fn serialize_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}
