// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! run_child(token?)
//!   stdout/stderr reader tasks (each returns its captured String)
//!   select { wait | timeout | cancelled }
//!   kill on timeout/cancel
//!   --> ChildOutcome::{Exited, TimedOut, Interrupted}
//! ```

use std::process::ExitStatus;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, StreamFlags};

/// How a child process finished.
pub(super) enum ChildOutcome {
    Exited {
        status: ExitStatus,
        stdout: String,
        stderr: String,
    },
    TimedOut,
    Interrupted,
}

/// Spawns a reader task draining one piped stream.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let name = process_name.to_string();
    stream.map(|stream| {
        tokio::spawn(async move { read_stream(stream, flags, &name, stream_name).await })
    })
}

/// Waits for a reader task and returns what it captured.
async fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

impl ProcessBuilder {
    /// Runs the child process, streaming output until it exits, times out or is cancelled.
    pub(super) async fn run_child(
        &self,
        name: &str,
        child: &mut Child,
        token: Option<&CancellationToken>,
    ) -> std::io::Result<ChildOutcome> {
        let stdout_handle = spawn_reader(child.stdout.take(), self.stdout_stream(), name, "stdout");
        let stderr_handle = spawn_reader(child.stderr.take(), self.stderr_stream(), name, "stderr");

        let timeout = self.timeout_duration();
        let timed_out = async {
            match timeout {
                Some(duration) => tokio::time::sleep(duration).await,
                None => std::future::pending().await,
            }
        };
        let cancelled = async {
            match token {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };

        let status = tokio::select! {
            status = child.wait() => Some(status?),
            () = timed_out => {
                warn!(process = %name, timeout = ?timeout, "process timed out");
                None
            }
            () = cancelled => {
                warn!(process = %name, "cancellation requested, terminating process");
                None
            }
        };

        let Some(status) = status else {
            child.kill().await.ok();
            let _ = child.wait().await;
            // Grandchildren may still hold the pipes open.
            for handle in [stdout_handle, stderr_handle].into_iter().flatten() {
                handle.abort();
            }
            let interrupted = token.is_some_and(CancellationToken::is_cancelled);
            return Ok(if interrupted {
                ChildOutcome::Interrupted
            } else {
                ChildOutcome::TimedOut
            });
        };

        Ok(ChildOutcome::Exited {
            status,
            stdout: join_reader(stdout_handle).await,
            stderr: join_reader(stderr_handle).await,
        })
    }
}

/// Reads a stream line by line, forwarding to the log and/or keeping the text.
async fn read_stream<R>(reader: R, flags: StreamFlags, process_name: &str, stream_name: &str) -> String
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut captured = String::new();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    trace!(process = %process_name, stream = %stream_name, line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    if !captured.is_empty() {
                        captured.push('\n');
                    }
                    captured.push_str(&line);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }
    captured
}
