// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end backup runs with real git and tar against local repositories.
//!
//! GitHub is mocked; storage is the in-memory store.

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use repo_vault::backup::BackupManager;
use repo_vault::backup::keys::{archive_key, date_stamp};
use repo_vault::config::{Config, ToolsConfig};
use repo_vault::git::GitTarArchiver;
use repo_vault::github::GitHubClient;
use repo_vault::matcher::RepoMatcher;
use repo_vault::storage::{ArchiveUploader, MemoryStore};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn git(args: &[&str], cwd: &Path) {
    let status = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(status.status.success(), "git {args:?} failed");
}

fn local_repo(root: &Path, name: &str) -> PathBuf {
    let path = root.join("sources").join(name);
    std::fs::create_dir_all(&path).unwrap();
    git(&["init", "--quiet"], &path);
    git(&["config", "user.email", "test@example.com"], &path);
    git(&["config", "user.name", "Test"], &path);
    std::fs::write(path.join("lecture.md"), format!("# {name}\n")).unwrap();
    git(&["add", "."], &path);
    git(&["commit", "-m", "init", "--quiet"], &path);
    path
}

async fn mock_org(entries: &[(&str, &Path, bool)]) -> MockServer {
    let server = MockServer::start().await;
    let body: Vec<_> = entries
        .iter()
        .map(|(name, source, archived)| {
            json!({
                "name": name,
                "full_name": format!("quantecon/{name}"),
                "clone_url": source.to_str().unwrap(),
                "default_branch": "main",
                "archived": archived
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path("/orgs/quantecon/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn manager_for(
    server: &MockServer,
    config_yaml: &str,
) -> BackupManager<MemoryStore, GitTarArchiver> {
    let config = Config::parse(config_yaml).unwrap();
    let client = GitHubClient::new(&server.uri(), "").unwrap();
    let matcher = RepoMatcher::from_config(&config.backup).unwrap();
    let uploader = ArchiveUploader::new(MemoryStore::new(), &config.backup.s3.prefix);
    let archiver = GitTarArchiver::new(&ToolsConfig::default(), "", CancellationToken::new());
    BackupManager::new(client, matcher, uploader, archiver)
}

// =============================================================================
// Backup
// =============================================================================

#[tokio::test]
async fn backup_selects_archives_and_uploads() {
    let root = tempfile::tempdir().unwrap();
    let python = local_repo(root.path(), "lecture-python");
    let julia = local_repo(root.path(), "lecture-julia");
    let other = local_repo(root.path(), "website");
    let server = mock_org(&[
        ("lecture-python", &python, false),
        ("lecture-julia", &julia, true),
        ("website", &other, false),
    ])
    .await;

    let manager = manager_for(
        &server,
        "backup:\n  patterns: [\"lecture-\"]\n  exclude_archived: true\n  s3:\n    bucket: b\n",
    );

    let results = manager
        .backup_repositories("quantecon", true, false)
        .await
        .unwrap();

    assert_eq!(results.total_repos, 1);
    assert_eq!(results.successful, vec!["quantecon/lecture-python"]);
    assert!(results.failed.is_empty());

    let store = manager.uploader().store();
    let key = format!(
        "backups/{}",
        archive_key("lecture-python", &date_stamp(Utc::now()))
    );
    assert_eq!(store.keys(), vec![key.clone()]);

    let stored = store.get(&key).unwrap();
    assert!(stored.size > 0);
    assert_eq!(stored.metadata["size_bytes"], stored.size.to_string());
    assert_eq!(stored.metadata["head_commit"].len(), 40);
    assert_eq!(stored.metadata["repository"], "quantecon/lecture-python");
}

#[tokio::test]
async fn backup_bad_clone_url_fails_only_that_repo() {
    let root = tempfile::tempdir().unwrap();
    let good = local_repo(root.path(), "good");
    let missing = root.path().join("sources").join("missing");
    let server = mock_org(&[("good", &good, false), ("missing", &missing, false)]).await;

    let manager = manager_for(
        &server,
        "backup:\n  repositories: [good, missing]\n  s3:\n    bucket: b\n",
    );

    let results = manager
        .backup_repositories("quantecon", true, false)
        .await
        .unwrap();

    assert_eq!(results.successful, vec!["quantecon/good"]);
    assert_eq!(results.failed.len(), 1);
    assert_eq!(results.failed[0].repo, "quantecon/missing");
    assert!(results.failed[0].reason.contains("failed to clone"));
    assert!(results.has_failures());
}

// =============================================================================
// Report
// =============================================================================

#[tokio::test]
async fn report_after_backup_counts_stored_archive() {
    let root = tempfile::tempdir().unwrap();
    let repo = local_repo(root.path(), "lecture-jax");
    let server = mock_org(&[("lecture-jax", &repo, false)]).await;

    let manager = manager_for(
        &server,
        "backup:\n  patterns: [\"lecture-\"]\n  s3:\n    bucket: b\n    prefix: vault\n",
    );
    manager
        .backup_repositories("quantecon", true, false)
        .await
        .unwrap();

    let report = manager.report("quantecon").await.unwrap();

    assert_eq!(report.repos_with_backups, 1);
    let entry = &report.repositories["lecture-jax"];
    assert_eq!(entry.backup_count, 1);
    assert!(entry.backups[0].key.starts_with("vault/lecture-jax/"));
    assert_eq!(report.total_backup_size, entry.total_size);
}
