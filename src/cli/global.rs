// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Global CLI options available for all commands.
//!
//! # Option Precedence
//!
//! ```text
//! --config FILE        ← config.yml / *.toml
//! REPO_VAULT__A__B     ← environment overrides
//! --organization ORG   ← backup.organization override
//! --log-level N        ← console verbosity (0-5), beats --verbose
//! --file-log-level N   ← file verbosity (defaults to console level)
//!
//! Precedence: CLI flags > environment > config file > defaults
//! ```

use clap::Args;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::logging::{LogConfig, LogLevel};

/// Global options available for all commands.
#[derive(Debug, Clone, Args)]
pub struct GlobalOptions {
    /// Path to the configuration file (YAML, or TOML by extension).
    #[arg(short = 'c', long = "config", value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// GitHub organization, overrides backup.organization.
    #[arg(short = 'o', long = "organization", value_name = "ORG")]
    pub organization: Option<String>,

    /// GitHub token used for the API and for cloning.
    #[arg(
        long = "github-token",
        value_name = "TOKEN",
        env = "GITHUB_TOKEN",
        hide_env_values = true
    )]
    pub github_token: Option<String>,

    /// Shortcut for --log-level 4.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Console log level (0=silent, 1=errors, 2=warnings, 3=info, 4=debug, 5=trace).
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub log_level: Option<u8>,

    /// File log level, defaults to the console level.
    #[arg(long = "file-log-level", value_name = "LEVEL", value_parser = clap::value_parser!(u8).range(0..=5)
    )]
    pub file_log_level: Option<u8>,

    /// Path to log file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalOptions {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            organization: None,
            github_token: None,
            verbose: false,
            log_level: None,
            file_log_level: None,
            log_file: None,
        }
    }
}

impl GlobalOptions {
    /// Converts command-line options to configuration overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(String, String)> {
        let mut overrides = Vec::new();

        if let Some(org) = self.organization.as_deref().map(str::trim)
            && !org.is_empty()
        {
            overrides.push(("backup.organization".to_string(), org.to_string()));
        }

        overrides
    }

    /// Token from `--github-token` or `GITHUB_TOKEN`, if non-empty.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Console level: `--log-level`, else `--verbose`, else info.
    #[must_use]
    pub fn console_level(&self) -> LogLevel {
        self.log_level
            .and_then(LogLevel::from_u8)
            .unwrap_or_else(|| LogLevel::verbose(self.verbose))
    }

    /// Logging setup derived from the log options.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        let console_level = self.console_level();
        let file_level = self
            .file_log_level
            .and_then(LogLevel::from_u8)
            .unwrap_or(console_level);

        LogConfig::builder()
            .with_console_level(console_level)
            .with_file_level(file_level)
            .maybe_with_log_file(self.log_file.as_ref().map(|p| p.display().to_string()))
            .build()
    }
}
