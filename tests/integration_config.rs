// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for configuration loading.
//!
//! Tests config files on disk combined with command-line overrides.

use std::path::{Path, PathBuf};

use repo_vault::cli::global::GlobalOptions;
use repo_vault::cmd::config::{load_config, options_lines};
use repo_vault::cmd::require_organization;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn options_for(path: PathBuf) -> GlobalOptions {
    GlobalOptions {
        config: path,
        ..GlobalOptions::default()
    }
}

// =============================================================================
// Loading Files
// =============================================================================

#[test]
fn config_load_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "config.yml",
        r#"
backup:
  enabled: true
  organization: quantecon
  patterns: ["lecture-.*"]
  metadata:
    issues: true
  s3:
    bucket: vault
"#,
    );

    let config = load_config(&options_for(path)).unwrap();
    assert!(config.backup.enabled);
    assert!(config.backup.metadata.issues);
    assert_eq!(config.backup.s3.bucket, "vault");
    assert_eq!(require_organization(&config).unwrap(), "quantecon");
}

#[test]
fn config_load_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        dir.path(),
        "vault.toml",
        r#"
[backup]
enabled = true
repositories = ["QuantEcon.py"]

[backup.s3]
bucket = "vault"
region = "eu-central-1"
"#,
    );

    let config = load_config(&options_for(path)).unwrap();
    assert_eq!(config.backup.repositories, vec!["QuantEcon.py"]);
    assert_eq!(config.backup.s3.region, "eu-central-1");
}

#[test]
fn config_cli_organization_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.yml", "backup:\n  organization: from-file\n");

    let global = GlobalOptions {
        organization: Some("from-cli".to_string()),
        ..options_for(path)
    };
    let config = load_config(&global).unwrap();
    assert_eq!(require_organization(&config).unwrap(), "from-cli");
}

#[test]
fn config_missing_organization_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.yml", "backup:\n  enabled: true\n");

    let config = load_config(&options_for(path)).unwrap();
    let err = require_organization(&config).unwrap_err();
    assert!(err.to_string().contains("--organization"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn config_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(&options_for(dir.path().join("absent.yml"))).unwrap_err();
    assert!(err.to_string().contains("config file not found"), "{err}");
}

#[test]
fn config_invalid_regex_rejected_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.yml", "backup:\n  patterns: [\"(\"]\n");

    let err = load_config(&options_for(path)).unwrap_err();
    assert!(err.to_string().contains("invalid pattern"), "{err}");
}

#[test]
fn config_unknown_key_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.yml", "backup:\n  enabeld: true\n");

    assert!(load_config(&options_for(path)).is_err());
}

// =============================================================================
// Options Output
// =============================================================================

#[test]
fn config_options_hide_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "config.yml", "backup:\n  s3:\n    bucket: vault\n");

    let global = GlobalOptions {
        github_token: Some("ghp_secret_value".to_string()),
        ..options_for(path)
    };
    let config = load_config(&global).unwrap();
    let lines = options_lines(&config, &global);

    assert!(lines.iter().all(|line| !line.contains("ghp_secret_value")));
    assert_eq!(
        lines.last().map(String::as_str),
        Some("github.token                = (set)")
    );
}
