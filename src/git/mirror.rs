// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! git CLI clone and tar archive steps.

use std::path::Path;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::core::process::{ProcessBuilder, redact};
use crate::error::GitError;

/// Inserts the token into an `https://` clone URL.
///
/// Other schemes and an empty token are returned unchanged.
#[must_use]
pub fn authenticated_url(clone_url: &str, token: &str) -> String {
    match clone_url.strip_prefix("https://") {
        Some(rest) if !token.is_empty() => format!("https://x-access-token:{token}@{rest}"),
        _ => clone_url.to_string(),
    }
}

/// Runs `git clone --mirror --quiet` into `dest`.
///
/// # Errors
///
/// Returns `GitError::CloneFailed` with the token masked.
pub async fn clone_mirror(
    git: &Path,
    clone_url: &str,
    token: &str,
    dest: &Path,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<(), GitError> {
    ProcessBuilder::new(git)
        .name("git")
        .args(["clone", "--mirror", "--quiet"])
        .arg(authenticated_url(clone_url, token))
        .arg(dest)
        .env("GIT_TERMINAL_PROMPT", "0")
        .env("GCM_INTERACTIVE", "never")
        .secret(token)
        .timeout_opt(timeout)
        .capture_stderr()
        .run_with_cancellation(cancel.clone())
        .await
        .map(drop)
        .map_err(|e| GitError::CloneFailed {
            url: clone_url.to_string(),
            message: redact(&e.to_string(), token),
        })
}

/// Runs `tar -czf <archive> -C <parent> <name>`.
///
/// # Errors
///
/// Returns `GitError::ArchiveFailed` if tar fails.
pub async fn create_archive(
    tar: &Path,
    parent: &Path,
    name: &str,
    archive: &Path,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<(), GitError> {
    ProcessBuilder::new(tar)
        .name("tar")
        .arg("-czf")
        .arg(archive)
        .arg("-C")
        .arg(parent)
        .arg(name)
        .timeout_opt(timeout)
        .capture_stderr()
        .run_with_cancellation(cancel.clone())
        .await
        .map(drop)
        .map_err(|e| GitError::ArchiveFailed {
            path: archive.display().to_string(),
            message: e.to_string(),
        })
}
