// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for repo-vault.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. --config file (config.yml; TOML when *.toml)
//! 3. REPO_VAULT__* env vars
//! 4. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! REPO_VAULT__BACKUP__ENABLED=true        → backup.enabled = true
//! REPO_VAULT__BACKUP__S3__BUCKET=vault    → backup.s3.bucket = "vault"
//! REPO_VAULT__GITHUB__API_URL=http://...  → github.api_url = "http://..."
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::matcher::RepoMatcher;

pub use loader::ConfigLoader;
pub use types::{BackupConfig, GitHubConfig, MetadataConfig, S3Config, ToolsConfig};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "REPO_VAULT";

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Backup selection, behavior and storage target.
    pub backup: BackupConfig,
    /// GitHub API settings.
    pub github: GitHubConfig,
    /// External tool locations.
    pub tools: ToolsConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use repo_vault::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_file("config.yml")
    ///     .with_env_prefix("REPO_VAULT")
    ///     .build()?;
    /// # Ok::<(), repo_vault::error::ConfigError>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a file plus `REPO_VAULT__*` overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` when the file does not exist, otherwise
    /// any parse or validation error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        Self::builder()
            .add_file(path)
            .with_env_prefix(ENV_PREFIX)
            .build()
    }

    /// Load configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid YAML, does not match the
    /// `Config` structure, or fails validation.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::builder().add_yaml_str(content).build()
    }

    /// Validates values that serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns the first invalid pattern or value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        RepoMatcher::from_config(&self.backup)?;

        if self.backup.clone_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                section: "backup".to_string(),
                key: "clone_timeout_secs".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }

        if self.github.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                section: "github".to_string(),
                key: "api_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap` and column aligned.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_backup_options(&mut options);
        self.format_s3_options(&mut options);
        options.insert("github.api_url".into(), self.github.api_url.clone());
        options.insert("tools.git".into(), self.tools.git.display().to_string());
        options.insert("tools.tar".into(), self.tools.tar.display().to_string());
        options.insert("tools.aws".into(), self.tools.aws.display().to_string());

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_backup_options(&self, options: &mut BTreeMap<String, String>) {
        let list = |items: &[String]| format!("[{}]", items.join(", "));
        let backup = &self.backup;

        options.insert("backup.enabled".into(), backup.enabled.to_string());
        if let Some(organization) = &backup.organization {
            options.insert("backup.organization".into(), organization.clone());
        }
        options.insert("backup.patterns".into(), list(&backup.patterns));
        options.insert("backup.repositories".into(), list(&backup.repositories));
        options.insert(
            "backup.exclude_patterns".into(),
            list(&backup.exclude_patterns),
        );
        options.insert(
            "backup.exclude_repositories".into(),
            list(&backup.exclude_repositories),
        );
        options.insert(
            "backup.exclude_archived".into(),
            backup.exclude_archived.to_string(),
        );
        options.insert(
            "backup.clone_timeout_secs".into(),
            backup
                .clone_timeout_secs
                .map_or_else(|| "none".to_string(), |s| s.to_string()),
        );
        options.insert(
            "backup.metadata.issues".into(),
            backup.metadata.issues.to_string(),
        );
    }

    fn format_s3_options(&self, options: &mut BTreeMap<String, String>) {
        let s3 = &self.backup.s3;
        options.insert("backup.s3.bucket".into(), s3.bucket.clone());
        options.insert("backup.s3.region".into(), s3.region.clone());
        options.insert("backup.s3.prefix".into(), s3.prefix.clone());
        if let Some(endpoint) = &s3.endpoint_url {
            options.insert("backup.s3.endpoint_url".into(), endpoint.clone());
        }
    }
}
