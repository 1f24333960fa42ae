//! External command execution.
//!
//! Every child process the registrar starts (the archive tool, the
//! post-extraction script, release probes and the curl transport) goes
//! through [`execute`].

use crate::error::{RegistrarError, Result};
use std::ffi::OsStr;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Get stdout, trimmed of whitespace.
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Render a program and its arguments for log and error messages.
pub fn describe<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut parts = vec![program.to_string()];
    parts.extend(
        args.iter()
            .map(|a| a.as_ref().to_string_lossy().into_owned()),
    );
    parts.join(" ")
}

/// Run `program` with `args`, capturing stdout and stderr.
///
/// A non-zero exit is reported through [`CommandResult::success`]; only a
/// failure to start the process is an error.
pub fn execute<S: AsRef<OsStr>>(program: &str, args: &[S]) -> Result<CommandResult> {
    let start = Instant::now();
    let rendered = describe(program, args);
    tracing::debug!("running {}", rendered);

    let mut cmd = Command::new(program);
    cmd.args(args);

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().map_err(|e| {
        tracing::debug!("failed to start {}: {}", rendered, e);
        RegistrarError::CommandFailed {
            command: rendered.clone(),
            code: None,
        }
    })?;

    let duration = start.elapsed();
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let result = if output.status.success() {
        CommandResult::success(stdout, stderr, duration)
    } else {
        CommandResult::failure(output.status.code(), stdout, stderr, duration)
    };
    tracing::debug!(
        "{} exited with {:?} after {:?}",
        rendered,
        result.exit_code,
        result.duration
    );

    Ok(result)
}

/// Run a command and return its trimmed stdout when it succeeds.
///
/// Any failure (missing program, non-zero exit) yields `None`.
pub fn capture_stdout(program: &str, args: &[&str]) -> Option<String> {
    execute(program, args)
        .ok()
        .filter(|r| r.success)
        .map(|r| r.stdout_trimmed().to_string())
}
