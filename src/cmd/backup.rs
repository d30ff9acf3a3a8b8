// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup command implementation.

use anyhow::anyhow;
use tracing::{info, warn};

use crate::backup::BackupResults;
use crate::cli::BackupArgs;
use crate::cli::global::GlobalOptions;
use crate::cmd::{build_manager, cancel_on_ctrl_c, check_tools, require_organization, require_token};
use crate::config::Config;
use crate::error::Result;

/// Main handler for backup command.
///
/// # Errors
///
/// Returns an error if setup fails (token, organization, tools, bucket),
/// the repository list cannot be fetched, or any repository failed.
pub async fn run_backup_command(
    args: &BackupArgs,
    config: &Config,
    global: &GlobalOptions,
) -> Result<()> {
    let token = require_token(global)?;

    if !config.backup.enabled {
        warn!("Backup is disabled in configuration (backup.enabled = false)");
        return Ok(());
    }

    let organization = require_organization(config)?;
    check_tools(config, !args.dry_run)?;

    let cancel = cancel_on_ctrl_c();
    let manager = build_manager(config, &token, &cancel)?;

    let results = manager
        .backup_repositories(&organization, !args.force, args.dry_run)
        .await?;

    log_summary(&results);

    if results.has_failures() {
        return Err(anyhow!(
            "{} of {} repositories failed",
            results.failed.len(),
            results.total_repos
        ));
    }
    Ok(())
}

fn log_summary(results: &BackupResults) {
    if results.dry_run {
        info!(
            "Dry run summary: {} would be backed up, {} already exist",
            results.would_backup.len(),
            results.skipped.len()
        );
        for planned in &results.would_backup {
            info!("  {} -> {}", planned.repo, planned.backup_key);
        }
        return;
    }

    info!(
        "Backup summary: {} total, {} successful, {} failed, {} skipped",
        results.total_repos,
        results.successful.len(),
        results.failed.len(),
        results.skipped.len()
    );
    for failure in &results.failed {
        warn!("  failed: {} ({})", failure.repo, failure.reason);
    }

    let issues = &results.issues_backup;
    if !(issues.successful.is_empty() && issues.failed.is_empty() && issues.skipped.is_empty()) {
        info!(
            "Issues summary: {} successful, {} failed, {} skipped",
            issues.successful.len(),
            issues.failed.len(),
            issues.skipped.len()
        );
    }
}
