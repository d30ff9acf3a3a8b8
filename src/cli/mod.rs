// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for repo-vault using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! repo-vault [global options] <command>
//! backup [--force] [--dry-run]
//! report [--json]
//! options
//! version
//! ```

pub mod global;


use crate::cli::global::GlobalOptions;
use clap::{Args, Parser, Subcommand};

/// Organization Repository Backup Tool
///
/// Mirrors the repositories of a GitHub organization into S3.
#[derive(Debug, Parser)]
#[command(
    name = "repo-vault",
    author,
    version,
    about = "Organization Repository Backup Tool",
    long_about = "repo-vault Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Mirror-clones every selected repository of a GitHub organization,\n\
                  archives it and uploads the archive to S3, one object per\n\
                  repository per UTC day. See `repo-vault <command> --help` for\n\
                  more information about a command.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are read from config.yml (or the file given with\n\
                  --config; a .toml extension selects TOML). Any key can be\n\
                  overridden from the environment as REPO_VAULT__SECTION__KEY,\n\
                  for example REPO_VAULT__BACKUP__S3__BUCKET=my-bucket.\n\
                  The GitHub token is read from GITHUB_TOKEN."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their effective values.
    Options,

    /// Backs up matching repositories.
    Backup(BackupArgs),

    /// Shows statistics about stored backups.
    Report(ReportArgs),
}

/// Arguments for `backup`.
#[derive(Debug, Clone, Default, Args)]
pub struct BackupArgs {
    /// Backs up again even if today's archive already exists.
    #[arg(long)]
    pub force: bool,

    /// Shows what would be backed up without cloning or uploading.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Arguments for `report`.
#[derive(Debug, Clone, Default, Args)]
pub struct ReportArgs {
    /// Prints the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments from an iterator.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse_from<I, T>(iter: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(iter)
}
