// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and lifecycle management.
//!
//! ```text
//! run() / run_with_cancellation(token)
//!              |
//!              v
//!     build_command()
//!     args, env, stdio
//!              |
//!              v
//!     spawn() + run_child()
//!              |
//!     +--------+---------+
//!     v        v         v
//!  Exited   TimedOut  Interrupted
//!     |        |         |
//!     v        v         v
//!  check    Timeout   Interrupted
//!  exit     error     error
//!  code
//!     |
//!     v
//!  ProcessOutput { exit_code, stdout, stderr }
//! ```

use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use super::io::ChildOutcome;
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Returns the display name for this process.
    fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string for logging, with the secret masked.
    pub(crate) fn command_line(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = format!("{}", self.program().display());
        for arg in self.args_slice() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        self.mask(&cmd)
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The process exceeds its timeout.
    /// - The process exits with an unexpected status (and `ALLOW_FAILURE` is not set).
    pub async fn run(self) -> Result<ProcessOutput, ProcessError> {
        self.execute(None).await
    }

    /// Spawns and runs the process, killing it when `token` is cancelled.
    ///
    /// A token that is already cancelled prevents the spawn entirely.
    ///
    /// # Errors
    ///
    /// Same as [`ProcessBuilder::run`], plus `ProcessError::Interrupted` on cancellation.
    pub async fn run_with_cancellation(
        self,
        token: CancellationToken,
    ) -> Result<ProcessOutput, ProcessError> {
        self.execute(Some(&token)).await
    }

    async fn execute(
        self,
        token: Option<&CancellationToken>,
    ) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if token.is_some_and(CancellationToken::is_cancelled) {
            return Err(ProcessError::Interrupted { command: cmd_line });
        }

        debug!(cmd = %cmd_line, "exec");

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let outcome = self
            .run_child(&name, &mut child, token)
            .await
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;

        let output = match outcome {
            ChildOutcome::Exited {
                status,
                stdout,
                stderr,
            } => ProcessOutput::new(status.code().unwrap_or(-1), stdout, self.mask(&stderr)),
            ChildOutcome::TimedOut => {
                return Err(ProcessError::Timeout {
                    command: cmd_line,
                    timeout_secs: self.timeout_duration().map_or(0, |d| d.as_secs()),
                });
            }
            ChildOutcome::Interrupted => {
                return Err(ProcessError::Interrupted { command: cmd_line });
            }
        };

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE)
            && !output.success()
        {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
                stderr: output.stderr().trim().to_string(),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        for (key, value) in self.env_vars() {
            command.env(key, value);
        }

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        command
    }
}
