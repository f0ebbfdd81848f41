//! Runner: the single place that starts external analysis scripts.
//!
//! One request maps to one child process. The child is awaited as a single
//! task and its stdout, stderr and exit code come back together as a
//! [`ProcessOutput`]; nothing is streamed to the caller.
//!
//! `AppState` holds an `Arc<dyn ScriptExecutor>`; [`ProcessExecutor`] is the
//! production backend.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

/// What to run: `<program> <script> <args...>`.
#[derive(Debug, Clone)]
pub struct ScriptCommand {
    pub program: String,
    pub script: PathBuf,
    /// Positional arguments. May contain credentials, so never logged.
    pub args: Vec<OsString>,
}

/// Everything a finished child process produced.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// `None` when the process was terminated by a signal.
    pub status: Option<i32>,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs a script to completion. Implement this to swap the process backend
/// without touching the handlers.
#[async_trait]
pub trait ScriptExecutor: Send + Sync {
    async fn run(&self, command: &ScriptCommand) -> Result<ProcessOutput>;
}

/// Spawns the script as an OS child process via tokio.
///
/// No timeout: a hung script holds its request open until it exits.
pub struct ProcessExecutor;

#[async_trait]
impl ScriptExecutor for ProcessExecutor {
    async fn run(&self, command: &ScriptCommand) -> Result<ProcessOutput> {
        let child = Command::new(&command.program)
            .arg(&command.script)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| {
                format!(
                    "Failed to start {} {}",
                    command.program,
                    command.script.display()
                )
            })?;

        info!(
            "Started {} (pid {:?})",
            command.script.display(),
            child.id()
        );

        // Drains both pipes concurrently while waiting for exit.
        let output = child
            .wait_with_output()
            .await
            .context("Failed to collect script output")?;

        let output = ProcessOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status.code(),
        };

        if !output.stderr.is_empty() {
            warn!(
                "{} stderr: {}",
                command.script.display(),
                output.stderr_text().trim_end()
            );
        }
        info!(
            "{} exited with status {:?} ({} bytes stdout)",
            command.script.display(),
            output.status,
            output.stdout.len()
        );

        Ok(output)
    }
}
