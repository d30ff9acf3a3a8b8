// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for repo-vault.

use crate::cli::global::GlobalOptions;
use crate::config::{Config, ConfigLoader, ENV_PREFIX};
use crate::error::{ConfigError, VaultResult};

/// Loads the configuration named by `--config`, applying environment and
/// command-line overrides.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, otherwise any
/// parse, override or validation error.
pub fn load_config(global: &GlobalOptions) -> VaultResult<Config> {
    Ok(build_config_loader(global)?.build()?)
}

fn build_config_loader(global: &GlobalOptions) -> std::result::Result<ConfigLoader, ConfigError> {
    if !global.config.is_file() {
        return Err(ConfigError::NotFound(global.config.display().to_string()));
    }

    let mut loader = Config::builder()
        .add_file(&global.config)
        .with_env_prefix(ENV_PREFIX);
    for (key, value) in global.to_config_overrides() {
        loader = loader.set(&key, value)?;
    }
    Ok(loader)
}

/// Lines printed by `options`; the token is only reported as set or not.
#[must_use]
pub fn options_lines(config: &Config, global: &GlobalOptions) -> Vec<String> {
    let mut lines = config.format_options();
    let token = if global.token().is_some() {
        "(set)"
    } else {
        "(not set)"
    };
    let width = lines
        .iter()
        .filter_map(|line| line.find(" = "))
        .max()
        .unwrap_or(0);
    lines.push(format!("{:<width$} = {token}", "github.token"));
    lines
}

/// Display current configuration options.
pub fn run_options_command(config: &Config, global: &GlobalOptions) {
    for line in options_lines(config, global) {
        println!("{line}");
    }
}
