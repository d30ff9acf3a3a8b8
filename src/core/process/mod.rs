// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::which("git")?
//!   .args() .env() .secret() .timeout_opt() .capture_output()
//!   .run() / .run_with_cancellation(token)
//!       --> tokio::process::Command
//!           stdout/stderr reader tasks
//!           timeout | cancel | exit
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
mod io;
mod runner;

pub use builder::{ProcessBuilder, ProcessFlags, ProcessOutput, StreamFlags};

/// Replaces every occurrence of `secret` in `text` with `***`.
///
/// An empty secret leaves the text untouched.
#[must_use]
pub fn redact(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, "***")
}
