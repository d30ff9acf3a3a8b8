// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests running the `repo-vault` binary end to end.
//!
//! GitHub is mocked; `aws` is replaced by a shell script printing a canned
//! `list-objects-v2` response.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Output;

use serde_json::json;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BIN: &str = env!("CARGO_BIN_EXE_repo-vault");

fn fake_aws(dir: &Path) -> PathBuf {
    let script = dir.join("aws");
    std::fs::write(
        &script,
        r#"#!/bin/sh
cat <<'EOF'
{"Contents": [{"Key": "backups/lecture-python/lecture-python-20260101.tar.gz", "Size": 2048, "LastModified": "2026-01-01T02:00:00+00:00"}], "IsTruncated": false}
EOF
"#,
    )
    .unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script
}

async fn org_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/quantecon/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "name": "lecture-python",
            "full_name": "quantecon/lecture-python",
            "clone_url": "https://github.com/quantecon/lecture-python.git",
            "default_branch": "main",
            "archived": false
        }])))
        .mount(&server)
        .await;
    server
}

async fn run(args: &[&str], token: Option<&str>) -> Output {
    let mut command = Command::new(BIN);
    command.args(args).env_remove("GITHUB_TOKEN");
    if let Some(token) = token {
        command.env("GITHUB_TOKEN", token);
    }
    command.output().await.unwrap()
}

// =============================================================================
// Report
// =============================================================================

#[tokio::test]
async fn report_json_stdout_is_pure_json() {
    let dir = tempfile::tempdir().unwrap();
    let server = org_server().await;
    let aws = fake_aws(dir.path());
    let config = dir.path().join("config.yml");
    std::fs::write(
        &config,
        format!(
            "backup:\n  organization: quantecon\n  patterns: [\"lecture-\"]\n  s3:\n    bucket: vault\ngithub:\n  api_url: \"{}\"\ntools:\n  aws: \"{}\"\n",
            server.uri(),
            aws.display()
        ),
    )
    .unwrap();

    let output = run(
        &["-c", config.to_str().unwrap(), "report", "--json"],
        Some("tok"),
    )
    .await;

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "stderr: {stderr}");

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["organization"], "quantecon");
    assert_eq!(report["repos_with_backups"], 1);
    assert_eq!(report["total_backup_size"], 2048);

    assert!(stderr.contains("Backup report"));
    assert!(!stderr.contains('\x1b'), "ANSI codes on a non-terminal");
}

// =============================================================================
// Backup Preflight
// =============================================================================

#[tokio::test]
async fn backup_without_token_fails_even_when_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yml");
    std::fs::write(&config, "backup:\n  enabled: false\n").unwrap();

    let output = run(&["-c", config.to_str().unwrap(), "backup"], None).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("GITHUB_TOKEN"));
}

#[tokio::test]
async fn backup_disabled_with_token_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.yml");
    std::fs::write(&config, "backup:\n  enabled: false\n").unwrap();

    let output = run(&["-c", config.to_str().unwrap(), "backup"], Some("tok")).await;

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("disabled"));
}
