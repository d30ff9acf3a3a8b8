// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(5).is_ok());
    assert!(LogLevel::new(6).is_err());
    assert_eq!(LogLevel::from_u8(9), None);
}

#[test]
fn test_verbose_selects_debug() {
    assert_eq!(LogLevel::verbose(true), LogLevel::DEBUG);
    assert_eq!(LogLevel::verbose(false), LogLevel::INFO);
}

#[test]
fn test_filter_strings() {
    let filters: Vec<_> = (0..=5)
        .filter_map(LogLevel::from_u8)
        .map(LogLevel::to_filter_string)
        .collect();
    insta::assert_yaml_snapshot!(filters, @r#"
    - "off"
    - error
    - warn
    - "warn,repo_vault=info"
    - "warn,repo_vault=debug"
    - trace
    "#);
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
    assert!(config.log_file().is_none());
    assert!(!config.show_target());
}

#[test]
fn test_open_log_file_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("nightly").join("vault.log");

    super::open_log_file(&path).unwrap();
    assert!(path.is_file());
}
