// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for CLI parsing.
//!
//! Tests the CLI module with realistic command-line argument patterns.

use clap::CommandFactory;
use repo_vault::cli::{Cli, Command, try_parse_from};
use repo_vault::logging::LogLevel;

// =============================================================================
// Commands
// =============================================================================

#[test]
fn cli_version_command() {
    let cli = try_parse_from(["repo-vault", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn cli_no_command_is_allowed() {
    let cli = try_parse_from(["repo-vault"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn cli_backup_defaults() {
    let cli = try_parse_from(["repo-vault", "backup"]).unwrap();
    let Some(Command::Backup(args)) = cli.command else {
        panic!("expected backup");
    };
    assert!(!args.force);
    assert!(!args.dry_run);
}

#[test]
fn cli_unknown_command_rejected() {
    let err = try_parse_from(["repo-vault", "restore"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
}

#[test]
fn cli_unknown_flag_rejected() {
    assert!(try_parse_from(["repo-vault", "backup", "--everything"]).is_err());
}

// =============================================================================
// Global Options
// =============================================================================

#[test]
fn cli_global_options_after_subcommand() {
    let cli = try_parse_from([
        "repo-vault",
        "report",
        "--json",
        "--organization",
        "quantecon",
        "--verbose",
    ])
    .unwrap();

    assert!(matches!(cli.command, Some(Command::Report(ref args)) if args.json));
    assert_eq!(cli.global.organization.as_deref(), Some("quantecon"));
    assert_eq!(cli.global.console_level(), LogLevel::DEBUG);
}

#[test]
fn cli_log_file_and_file_level() {
    let cli = try_parse_from([
        "repo-vault",
        "--log-file",
        "vault.log",
        "--file-log-level",
        "5",
        "options",
    ])
    .unwrap();

    let config = cli.global.log_config();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert_eq!(config.log_file(), Some("vault.log"));
}

// =============================================================================
// Help Text
// =============================================================================

#[test]
fn cli_help_mentions_environment_overrides() {
    let help = Cli::command().render_long_help().to_string();
    assert!(help.contains("REPO_VAULT__SECTION__KEY"));
    assert!(help.contains("GITHUB_TOKEN"));
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}
