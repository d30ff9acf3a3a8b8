// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for repo-vault.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   backup: BackupConfig
//!             patterns / repositories / exclude_*   (matcher rules)
//!             metadata: MetadataConfig { issues }
//!             s3: S3Config { bucket, region, prefix, endpoint_url }
//!   github: GitHubConfig { api_url }
//!   tools:  ToolsConfig  { git, tar, aws }
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default GitHub REST endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Backup selection and behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupConfig {
    /// Master switch; a disabled backup exits successfully without work.
    pub enabled: bool,
    /// Organization to back up when `--organization` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Include regexes, matched at the start of the repository name.
    pub patterns: Vec<String>,
    /// Exact repository names to include.
    pub repositories: Vec<String>,
    /// Exclude regexes, matched at the start of the repository name.
    pub exclude_patterns: Vec<String>,
    /// Exact repository names to exclude.
    pub exclude_repositories: Vec<String>,
    /// Drop archived repositories before matching.
    pub exclude_archived: bool,
    /// Optional limit for each clone/archive subprocess.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clone_timeout_secs: Option<u64>,
    /// Extra content backed up next to the mirror archive.
    pub metadata: MetadataConfig,
    /// Object storage target.
    pub s3: S3Config,
}

impl BackupConfig {
    /// Subprocess timeout, if configured.
    #[must_use]
    pub fn clone_timeout(&self) -> Option<Duration> {
        self.clone_timeout_secs.map(Duration::from_secs)
    }
}

/// Extra per-repository content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Export issues and their comments as JSON.
    pub issues: bool,
}

/// S3 bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct S3Config {
    /// Target bucket. Required by `backup` and `report`.
    pub bucket: String,
    /// Bucket region.
    pub region: String,
    /// Key prefix prepended to every backup key.
    pub prefix: String,
    /// Endpoint override for S3-compatible stores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: "us-east-1".to_string(),
            prefix: "backups/".to_string(),
            endpoint_url: None,
        }
    }
}

impl S3Config {
    /// Returns the bucket, failing when it is not configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` if the bucket is empty.
    pub fn require_bucket(&self) -> Result<&str, ConfigError> {
        let bucket = self.bucket.trim();
        if bucket.is_empty() {
            return Err(ConfigError::MissingKey {
                section: "backup.s3".to_string(),
                key: "bucket".to_string(),
            });
        }
        Ok(bucket)
    }
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitHubConfig {
    /// REST API base URL (GitHub Enterprise: `https://host/api/v3`).
    pub api_url: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// External tool locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Git executable.
    pub git: PathBuf,
    /// Tar executable.
    pub tar: PathBuf,
    /// AWS CLI executable.
    pub aws: PathBuf,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            git: PathBuf::from("git"),
            tar: PathBuf::from("tar"),
            aws: PathBuf::from("aws"),
        }
    }
}
