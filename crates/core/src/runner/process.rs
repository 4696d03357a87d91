//! Child process execution with a deadline

use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{Error, Result};

/// How often a running child is polled while a deadline is pending
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Raw output from one process execution
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
    /// Whether the process was still running at the deadline
    pub timed_out: bool,
}

impl ProcessOutput {
    /// Get stdout as a UTF-8 string, lossy conversion
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Get stderr as a UTF-8 string, lossy conversion
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Spawn `argv` with piped output and no stdin, and wait for it.
///
/// With a timeout, the deadline covers both the child and anything it left
/// holding its output pipes. Whatever is still running at the deadline is
/// killed along with its process group, and the output produced so far is
/// kept.
pub fn execute(argv: &[String], timeout: Option<Duration>) -> Result<ProcessOutput> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| Error::Config("empty interpreter command line".to_string()))?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Own process group so a timeout can take down the whole tree
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }

    let deadline = timeout.and_then(|limit| {
        let deadline = Instant::now().checked_add(limit);
        if deadline.is_none() {
            debug!("Timeout of {:?} is beyond any deadline, waiting without one", limit);
        }
        deadline
    });

    let mut child = cmd.spawn().map_err(|source| Error::Spawn {
        program: program.clone(),
        source,
    })?;
    let pid = child.id();
    debug!("Spawned {} (pid {})", program, pid);

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let waited = wait_with_deadline(&mut child, deadline);

    // Descendants may outlive the child and keep the pipes open
    let mut pipes_timed_out = false;
    if let (Ok((_, false)), Some(deadline)) = (&waited, deadline) {
        if !finished_by(&[&stdout, &stderr], deadline) {
            debug!("Output of pid {} still open at the deadline, killing its group", pid);
            kill_group(pid);
            pipes_timed_out = true;
        }
    }

    let stdout = join(stdout);
    let stderr = join(stderr);
    let (status, child_timed_out) = waited?;

    let exit_code = status.code();
    if exit_code.is_none() {
        debug!("{} terminated by signal: {}", program, status);
    }

    Ok(ProcessOutput {
        stdout,
        stderr,
        exit_code,
        timed_out: child_timed_out || pipes_timed_out,
    })
}

fn wait_with_deadline(child: &mut Child, deadline: Option<Instant>) -> Result<(ExitStatus, bool)> {
    let Some(deadline) = deadline else {
        return Ok((child.wait()?, false));
    };

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status, false)),
            Ok(None) => {}
            Err(e) => {
                kill_tree(child);
                let _ = child.wait();
                return Err(e.into());
            }
        }

        let now = Instant::now();
        if now >= deadline {
            debug!("Deadline reached, killing pid {}", child.id());
            kill_tree(child);
            let status = child.wait()?;
            return Ok((status, true));
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Wait until every reader has hit end-of-file, or the deadline passes
fn finished_by(readers: &[&Option<JoinHandle<Vec<u8>>>], deadline: Instant) -> bool {
    loop {
        let done = readers
            .iter()
            .all(|reader| reader.as_ref().is_none_or(JoinHandle::is_finished));
        if done {
            return true;
        }

        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}

/// Kill the child and everything in its process group
fn kill_tree(child: &mut Child) {
    kill_group(child.id());

    if let Err(e) = child.kill() {
        // Already reaped or exited between the poll and the kill
        debug!("kill({}) failed: {}", child.id(), e);
    }
}

/// Kill the process group led by `pid`; a no-op where groups are unsupported
fn kill_group(pid: u32) {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, killpg};
        use nix::unistd::Pid;

        let pgid = Pid::from_raw(pid as i32);
        if let Err(e) = killpg(pgid, Signal::SIGKILL) {
            debug!("killpg({}) failed: {}", pgid, e);
        }
    }
    #[cfg(not(unix))]
    let _ = pid;
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    let mut pipe = pipe?;
    Some(thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            warn!("Error reading child output: {}", e);
        }
        buf
    }))
}

fn join(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    match handle.map(JoinHandle::join) {
        Some(Ok(buf)) => buf,
        Some(Err(_)) => {
            warn!("Output reader thread panicked");
            Vec::new()
        }
        None => Vec::new(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["/bin/sh".into(), "-c".into(), script.into()]
    }

    #[test]
    fn test_captures_output_and_exit_code() {
        let output = execute(&sh("echo out; echo err >&2; exit 4"), None).unwrap();
        assert_eq!(output.stdout_string(), "out\n");
        assert_eq!(output.stderr_string(), "err\n");
        assert_eq!(output.exit_code, Some(4));
        assert!(!output.timed_out);
    }

    #[test]
    fn test_stdin_is_not_shared() {
        // `cat` sees end-of-file immediately instead of blocking
        let output = execute(&sh("cat; echo done"), Some(Duration::from_secs(10))).unwrap();
        assert_eq!(output.stdout_string(), "done\n");
        assert!(!output.timed_out);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let output = execute(&sh("printf 'a\\377b'"), None).unwrap();
        assert_eq!(output.stdout, b"a\xffb");
        assert_eq!(output.stdout_string(), "a\u{FFFD}b");
    }

    #[test]
    fn test_timeout_kills_and_keeps_partial_output() {
        let start = Instant::now();
        let output = execute(
            &sh("echo started; sleep 30; echo finished"),
            Some(Duration::from_millis(300)),
        )
        .unwrap();

        assert!(output.timed_out);
        assert_eq!(output.stdout_string(), "started\n");
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_timeout_kills_grandchildren() {
        // The backgrounded sleep keeps the pipe open unless the group dies
        let start = Instant::now();
        let output = execute(&sh("sleep 30 & sleep 30"), Some(Duration::from_millis(200))).unwrap();
        assert!(output.timed_out);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_deadline_covers_descendants_holding_the_pipes() {
        // The shell exits at once, the backgrounded sleep keeps stdout open
        let start = Instant::now();
        let output = execute(
            &sh("echo early; sleep 5 & exit 0"),
            Some(Duration::from_millis(300)),
        )
        .unwrap();

        assert!(output.timed_out);
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout_string(), "early\n");
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_descendants_closing_their_pipes_are_not_timed_out() {
        let output = execute(
            &sh("sleep 5 >/dev/null 2>&1 & echo done"),
            Some(Duration::from_secs(10)),
        )
        .unwrap();
        assert!(!output.timed_out);
        assert_eq!(output.stdout_string(), "done\n");
    }

    #[test]
    fn test_huge_timeout_waits_without_deadline() {
        let output = execute(&sh("exit 0"), Some(Duration::from_secs(i64::MAX as u64))).unwrap();
        assert!(!output.timed_out);
        assert_eq!(output.exit_code, Some(0));

        let output = execute(&sh("exit 0"), Some(Duration::MAX)).unwrap();
        assert_eq!(output.exit_code, Some(0));
    }

    #[test]
    fn test_fast_process_is_not_timed_out() {
        let output = execute(&sh("exit 0"), Some(Duration::from_secs(10))).unwrap();
        assert!(!output.timed_out);
        assert_eq!(output.exit_code, Some(0));
    }

    #[test]
    fn test_signal_has_no_exit_code() {
        let output = execute(&sh("kill -9 $$"), None).unwrap();
        assert_eq!(output.exit_code, None);
        assert!(!output.timed_out);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = execute(&["/no/such/interpreter".to_string()], None).unwrap_err();
        match err {
            Error::Spawn { program, .. } => assert_eq!(program, "/no/such/interpreter"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_command_line() {
        assert!(matches!(execute(&[], None), Err(Error::Config(_))));
    }
}
