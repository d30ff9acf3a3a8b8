// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Report command implementation.

use anyhow::Context;
use tracing::info;

use crate::cli::ReportArgs;
use crate::cli::global::GlobalOptions;
use crate::cmd::{build_manager, cancel_on_ctrl_c, check_tools, require_organization, require_token};
use crate::config::Config;
use crate::error::Result;

/// Main handler for report command.
///
/// # Errors
///
/// Returns an error if setup fails or the repository list cannot be fetched.
pub async fn run_report_command(
    args: &ReportArgs,
    config: &Config,
    global: &GlobalOptions,
) -> Result<()> {
    let token = require_token(global)?;
    let organization = require_organization(config)?;
    check_tools(config, false)?;

    let cancel = cancel_on_ctrl_c();
    let manager = build_manager(config, &token, &cancel)?;
    let report = manager.report(&organization).await?;

    info!(
        "Backup report: {} of {} repositories have backups, {:.2} GB total",
        report.repos_with_backups,
        report.total_repos,
        report.total_size_gb()
    );

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{json}");
    } else {
        for line in report.summary_lines() {
            println!("{line}");
        }
    }
    Ok(())
}
