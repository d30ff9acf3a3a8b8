// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   backup, report, config (options)
//!
//! shared setup:
//!   token + organization --> GitHubClient, RepoMatcher
//!   tools.aws + backup.s3 --> AwsCliStore --> ArchiveUploader
//!   tools.git/tar         --> GitTarArchiver
//!   Ctrl+C                --> CancellationToken
//! ```

pub mod backup;
pub mod config;
pub mod report;

use tokio_util::sync::CancellationToken;

use crate::backup::BackupManager;
use crate::cli::global::GlobalOptions;
use crate::config::Config;
use crate::core::process::ProcessBuilder;
use crate::error::{VaultResult, bail_out};
use crate::git::GitTarArchiver;
use crate::github::GitHubClient;
use crate::matcher::RepoMatcher;
use crate::storage::{ArchiveUploader, AwsCliStore};

/// Manager wired to the real tools.
pub type CliManager = BackupManager<AwsCliStore, GitTarArchiver>;

/// Returns the GitHub token or fails with a hint.
///
/// # Errors
///
/// Returns an error if neither `--github-token` nor `GITHUB_TOKEN` is set.
pub fn require_token(global: &GlobalOptions) -> VaultResult<String> {
    match global.token() {
        Some(token) => Ok(token.to_string()),
        None => Err(bail_out("GITHUB_TOKEN environment variable not set")),
    }
}

/// Returns the organization from the command line or configuration.
///
/// # Errors
///
/// Returns an error if no organization is configured.
pub fn require_organization(config: &Config) -> VaultResult<String> {
    match config
        .backup
        .organization
        .as_deref()
        .map(str::trim)
        .filter(|org| !org.is_empty())
    {
        Some(org) => Ok(org.to_string()),
        None => Err(bail_out(
            "organization must be specified via --organization or backup.organization",
        )),
    }
}

/// Fails early when a required tool is not on the PATH.
///
/// # Errors
///
/// Returns `ProcessError::ExecutableNotFound` for the first missing tool.
pub fn check_tools(config: &Config, need_git: bool) -> VaultResult<()> {
    let mut tools = vec![&config.tools.aws];
    if need_git {
        tools.push(&config.tools.git);
        tools.push(&config.tools.tar);
    }
    for tool in tools {
        ProcessBuilder::which(&tool.to_string_lossy())?;
    }
    Ok(())
}

/// Token cancelled on the first Ctrl+C.
#[must_use]
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting backup...");
            cancel_token.cancel();
        }
    });
    token
}

/// Builds the manager for `config` with the real GitHub, git, tar and aws tools.
///
/// # Errors
///
/// Returns an error for an invalid API URL, bad patterns or a missing bucket.
pub fn build_manager(
    config: &Config,
    token: &str,
    cancel: &CancellationToken,
) -> VaultResult<CliManager> {
    let client = GitHubClient::new(&config.github.api_url, token)?;
    let matcher = RepoMatcher::from_config(&config.backup)?;
    let store = AwsCliStore::new(&config.tools.aws, &config.backup.s3, cancel.clone())?;
    let uploader = ArchiveUploader::new(store, &config.backup.s3.prefix);
    let archiver = GitTarArchiver::new(&config.tools, token, cancel.clone())
        .with_timeout(config.backup.clone_timeout());

    Ok(BackupManager::new(client, matcher, uploader, archiver)
        .with_issues(config.backup.metadata.issues)
        .with_cancellation(cancel.clone()))
}
