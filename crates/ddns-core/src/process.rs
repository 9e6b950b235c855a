// # Process Runner
//
// Runs an external program to completion and captures what it printed.
//
// Providers that drive a vendor CLI never spawn processes themselves; they go
// through a [`ProcessRunner`](crate::traits::ProcessRunner) so tests can swap
// in a fake that records invocations.
//
// ## Failure model
//
// - The program could not be started → `ProcessError::Spawn`
// - The program exited non-zero (or was killed) → `ProcessError::NonZeroExit`
// - The optional timeout elapsed → `ProcessError::TimedOut` (child is killed)
//
// There is no retry here; callers report the first failure.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

use crate::traits::ProcessRunner;

/// Captured result of a successful process run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (`None` if terminated by a signal)
    pub status: Option<i32>,
    /// Everything written to standard output
    pub stdout: String,
    /// Everything written to standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// Output of a process that exited 0 after printing `stdout`
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            status: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Standard output split into lines
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}

/// Failure to run an external program
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The program could not be started (missing binary, permissions, ...)
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name
        program: String,
        /// OS error
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully
    #[error("{program} exited with {}: {stderr}", describe_exit(.code))]
    NonZeroExit {
        /// Program name
        program: String,
        /// Exit code (`None` if terminated by a signal)
        code: Option<i32>,
        /// Trimmed standard error
        stderr: String,
    },

    /// The program did not finish in time and was killed
    #[error("{program} timed out after {after:?}")]
    TimedOut {
        /// Program name
        program: String,
        /// Configured timeout
        after: Duration,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {}", c),
        None => "signal".to_string(),
    }
}

/// [`ProcessRunner`] backed by `tokio::process`
///
/// Standard input is closed; both output streams are captured in full.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner {
    timeout: Option<Duration>,
}

impl TokioProcessRunner {
    /// Create a runner with no timeout
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill and fail any invocation that runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError> {
        tracing::trace!("Spawning {} {:?}", program, args);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it
        let waited = match self.timeout {
            Some(after) => tokio::time::timeout(after, child.wait_with_output())
                .await
                .map_err(|_| ProcessError::TimedOut {
                    program: program.to_string(),
                    after,
                })?,
            None => child.wait_with_output().await,
        };

        let output = waited.map_err(|source| ProcessError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ProcessError::NonZeroExit {
                program: program.to_string(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(ProcessOutput {
            status: output.status.code(),
            stdout,
            stderr,
        })
    }
}
