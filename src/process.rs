//! Deadline-bounded execution of external processes.
//!
//! Every git or classifier subprocess runs under one overall [`Deadline`];
//! a child still running when the deadline passes is killed and reported as
//! [`ModtagError::Timeout`].

use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

use crate::error::{ModtagError, Result};

/// Point in time after which outstanding subprocesses are aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Deadline {
            at: Instant::now().checked_add(timeout),
        }
    }

    /// A deadline that never expires.
    pub fn never() -> Self {
        Deadline { at: None }
    }

    pub fn is_expired(&self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    /// Time left, or `None` for a deadline that never expires.
    pub fn remaining(&self) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(Instant::now()))
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Deadline::never()
    }
}

/// Runs `cmd` to completion, capturing stdout and stderr.
///
/// Fails if the process cannot be started or outlives `deadline`.
/// A non-zero exit status is not an error here; see [`run_checked`].
pub fn run(mut cmd: Command, deadline: Deadline) -> Result<Output> {
    let description = format!("{:?}", cmd);
    if deadline.is_expired() {
        return Err(ModtagError::Timeout {
            command: description,
        });
    }

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ModtagError::command(format!("starting {}: {}", description, e)))?;

    // Pipes are drained while waiting so a chatty child cannot block on a full buffer.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout));
    let stderr_reader = thread::spawn(move || drain(stderr));

    let status = match deadline.remaining() {
        None => child.wait()?,
        Some(remaining) => match child.wait_timeout(remaining)? {
            Some(status) => status,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                // Readers end when the last holder of the pipes exits.
                return Err(ModtagError::Timeout {
                    command: description,
                });
            }
        },
    };

    let stdout = stdout_reader
        .join()
        .map_err(|_| ModtagError::command(format!("reading stdout of {}", description)))?;
    let stderr = stderr_reader
        .join()
        .map_err(|_| ModtagError::command(format!("reading stderr of {}", description)))?;

    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

/// Like [`run`], but a non-zero exit status becomes a command error carrying stderr.
pub fn run_checked(cmd: Command, deadline: Deadline) -> Result<Output> {
    let description = format!("{:?}", cmd);
    let output = run(cmd, deadline)?;
    if !output.status.success() {
        return Err(ModtagError::command(format!(
            "{} exited with {}: {}",
            description,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(output)
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_run_captures_output() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo out; echo err >&2"]);
        let output = run(cmd, Deadline::never()).unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "out\n");
        assert_eq!(String::from_utf8_lossy(&output.stderr), "err\n");
    }

    #[test]
    fn test_run_checked_reports_failure() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo nope >&2; exit 3"]);
        let err = run_checked(cmd, Deadline::never()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_deadline_kills_slow_child() {
        let mut cmd = Command::new("sleep");
        cmd.arg("5");
        let started = Instant::now();
        let err = run(cmd, Deadline::after(Duration::from_millis(100))).unwrap_err();
        assert!(matches!(err, ModtagError::Timeout { .. }));
        assert!(err.to_string().contains("Deadline passed"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_expired_deadline_does_not_start() {
        let deadline = Deadline::after(Duration::ZERO);
        let err = run(Command::new("true"), deadline).unwrap_err();
        assert!(matches!(err, ModtagError::Timeout { .. }));
    }

    #[test]
    fn test_fast_child_finishes_within_deadline() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo done"]);
        let output = run(cmd, Deadline::after(Duration::from_secs(30))).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout), "done\n");
    }

    #[test]
    fn test_remaining_time() {
        assert_eq!(Deadline::never().remaining(), None);
        let left = Deadline::after(Duration::from_secs(60)).remaining().unwrap();
        assert!(left <= Duration::from_secs(60));
        assert!(left > Duration::from_secs(50));
    }
}
