// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup orchestration.
//!
//! ```text
//! backup_repositories(org)
//!   list_org_repos --> RepoMatcher::filter
//!   for each matched repo (strictly in order):
//!     key = {name}/{name}-{YYYYMMDD}.tar.gz
//!     skip-existing && exists(key) --> skipped (already_exists) --> issues
//!     dry-run                      --> would_backup                 (next)
//!     TempDir --> Archiver --> ArchiveUploader::upload
//!        ok   --> successful
//!        err  --> failed {reason}
//!     cancelled? --> failed (interrupted), stop
//!     issues enabled --> issues key: skipped | export + upload
//! ```

pub mod keys;
pub mod report;


use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::NetworkError;
use crate::git::{ArchivedMirror, Archiver};
use crate::github::{GitHubClient, Repository};
use crate::issues::{IssueExporter, timestamp};
use crate::matcher::RepoMatcher;
use crate::storage::{ArchiveUploader, Metadata, ObjectStore};

pub use report::{BackupReport, RepoBackups};

/// Reason recorded when an archive upload is not verified.
pub const UPLOAD_FAILED: &str = "upload_failed";
/// Reason recorded when the key already exists.
pub const ALREADY_EXISTS: &str = "already_exists";
/// Reason recorded when the run is cancelled mid-repository.
pub const INTERRUPTED: &str = "interrupted";

/// Repository with a reason, for skipped and failed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoReason {
    pub repo: String,
    pub reason: String,
}

/// Repository that would be backed up in dry-run mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedBackup {
    pub repo: String,
    pub backup_key: String,
}

/// Issue export outcomes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssuesResults {
    pub successful: Vec<String>,
    pub failed: Vec<RepoReason>,
    pub skipped: Vec<String>,
}

/// Summary of one backup run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackupResults {
    pub total_repos: usize,
    pub successful: Vec<String>,
    pub failed: Vec<RepoReason>,
    pub skipped: Vec<RepoReason>,
    pub would_backup: Vec<PlannedBackup>,
    pub issues_backup: IssuesResults,
    pub timestamp: String,
    pub dry_run: bool,
}

impl BackupResults {
    #[must_use]
    pub const fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    fn fail(&mut self, repo: &Repository, reason: impl Into<String>) {
        self.failed.push(RepoReason {
            repo: repo.full_name.clone(),
            reason: reason.into(),
        });
    }
}

/// Primary (archive) outcome for one repository.
enum Outcome {
    Skipped,
    Planned,
    Succeeded,
    Failed(String),
}

/// Source of the current time, replaceable in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Coordinates listing, archiving, uploading and issue export.
pub struct BackupManager<S, A> {
    client: GitHubClient,
    matcher: RepoMatcher,
    uploader: ArchiveUploader<S>,
    archiver: A,
    issues: bool,
    cancel: CancellationToken,
    clock: Clock,
}

impl<S: ObjectStore, A: Archiver> BackupManager<S, A> {
    pub fn new(
        client: GitHubClient,
        matcher: RepoMatcher,
        uploader: ArchiveUploader<S>,
        archiver: A,
    ) -> Self {
        Self {
            client,
            matcher,
            uploader,
            archiver,
            issues: false,
            cancel: CancellationToken::new(),
            clock: Arc::new(Utc::now),
        }
    }

    /// Enables issue export next to each archive.
    #[must_use]
    pub const fn with_issues(mut self, enabled: bool) -> Self {
        self.issues = enabled;
        self
    }

    /// Stops the run when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Replaces the clock used for backup keys and timestamps.
    #[must_use]
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use]
    pub const fn uploader(&self) -> &ArchiveUploader<S> {
        &self.uploader
    }

    /// Backs up every matching repository of `organization`.
    ///
    /// Per-repository failures are recorded in the result, not returned.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the repository list cannot be fetched.
    pub async fn backup_repositories(
        &self,
        organization: &str,
        skip_existing: bool,
        dry_run: bool,
    ) -> Result<BackupResults, NetworkError> {
        if dry_run {
            info!("dry run: nothing will be uploaded");
        }
        info!(organization, "starting backup");

        let repos = self.client.list_org_repos(organization).await?;
        let matched = self.matcher.filter(repos).matched;

        let mut results = BackupResults {
            total_repos: matched.len(),
            timestamp: timestamp((self.clock)()),
            dry_run,
            ..BackupResults::default()
        };

        for repo in &matched {
            if self.cancel.is_cancelled() {
                warn!("cancelled, not starting further repositories");
                break;
            }
            info!(repo = %repo.full_name, "processing");

            // Stamped per repository: a run may cross UTC midnight.
            let date = keys::date_stamp((self.clock)());
            let key = keys::archive_key(&repo.name, &date);
            let outcome = self.backup_archive(repo, &key, skip_existing, dry_run).await;

            if self.cancel.is_cancelled() {
                warn!(repo = %repo.full_name, "interrupted");
                results.fail(repo, INTERRUPTED);
                break;
            }

            match outcome {
                Outcome::Planned => {
                    info!(repo = %repo.full_name, key = %key, "[dry run] would back up");
                    results.would_backup.push(PlannedBackup {
                        repo: repo.full_name.clone(),
                        backup_key: key,
                    });
                    continue;
                }
                Outcome::Skipped => results.skipped.push(RepoReason {
                    repo: repo.full_name.clone(),
                    reason: ALREADY_EXISTS.to_string(),
                }),
                Outcome::Succeeded => results.successful.push(repo.full_name.clone()),
                Outcome::Failed(reason) => {
                    error!(repo = %repo.full_name, reason = %reason, "backup failed");
                    results.fail(repo, reason);
                }
            }

            if self.issues && !dry_run {
                self.backup_issues(repo, &date, skip_existing, &mut results)
                    .await;
            }
        }

        if dry_run {
            info!(
                would_backup = results.would_backup.len(),
                skipped = results.skipped.len(),
                "dry run complete"
            );
        } else {
            info!(
                successful = results.successful.len(),
                failed = results.failed.len(),
                skipped = results.skipped.len(),
                "backup complete"
            );
        }
        Ok(results)
    }

    async fn key_exists(&self, key: &str) -> bool {
        match self.uploader.exists(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(key, error = %e, "existence check failed, treating as absent");
                false
            }
        }
    }

    async fn backup_archive(
        &self,
        repo: &Repository,
        key: &str,
        skip_existing: bool,
        dry_run: bool,
    ) -> Outcome {
        if skip_existing && self.key_exists(key).await {
            info!(repo = %repo.full_name, key, "backup exists, skipping");
            return Outcome::Skipped;
        }
        if dry_run {
            return Outcome::Planned;
        }

        let work = match tempfile::Builder::new().prefix("repo-vault-").tempdir() {
            Ok(dir) => dir,
            Err(e) => return Outcome::Failed(format!("failed to create temp dir: {e}")),
        };

        let archived = match self.archiver.archive(repo, work.path()).await {
            Ok(archived) => archived,
            Err(e) => return Outcome::Failed(e.to_string()),
        };

        let metadata = archive_metadata(repo, &archived);
        if self
            .uploader
            .upload(&archived.archive_path, key, &metadata)
            .await
        {
            Outcome::Succeeded
        } else {
            Outcome::Failed(UPLOAD_FAILED.to_string())
        }
    }

    async fn backup_issues(
        &self,
        repo: &Repository,
        date: &str,
        skip_existing: bool,
        results: &mut BackupResults,
    ) {
        let key = keys::issues_key(&repo.name, date);
        let issues = &mut results.issues_backup;

        if skip_existing && self.key_exists(&key).await {
            info!(repo = %repo.full_name, key = %key, "issues backup exists, skipping");
            issues.skipped.push(repo.full_name.clone());
            return;
        }

        match self.export_issues(repo, &key).await {
            Ok(total) => {
                info!(repo = %repo.full_name, key = %key, total, "issues backed up");
                issues.successful.push(repo.full_name.clone());
            }
            Err(reason) => {
                error!(repo = %repo.full_name, reason = %reason, "issues backup failed");
                issues.failed.push(RepoReason {
                    repo: repo.full_name.clone(),
                    reason,
                });
            }
        }
    }

    async fn export_issues(&self, repo: &Repository, key: &str) -> Result<usize, String> {
        let export = IssueExporter::new(&self.client)
            .export(repo)
            .await
            .map_err(|e| e.to_string())?;

        let work = tempfile::Builder::new()
            .prefix("repo-vault-issues-")
            .tempdir()
            .map_err(|e| format!("failed to create temp dir: {e}"))?;
        let path = work.path().join(format!("{}-issues.json", repo.name));
        export.save_to_file(&path).map_err(|e| e.to_string())?;

        let total = export.total_issues();
        let metadata = issues_metadata(repo, total);
        if self.uploader.upload(&path, key, &metadata).await {
            Ok(total)
        } else {
            Err(UPLOAD_FAILED.to_string())
        }
    }

    /// Lists stored backups for every matching repository.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the repository list cannot be fetched.
    pub async fn report(&self, organization: &str) -> Result<BackupReport, NetworkError> {
        let repos = self.client.list_org_repos(organization).await?;
        let matched = self.matcher.filter(repos).matched;

        let mut report = BackupReport::new(organization, matched.len());
        for repo in &matched {
            report.add(&repo.name, self.uploader.list_backups(&repo.name).await);
        }
        Ok(report)
    }
}

fn archive_metadata(repo: &Repository, archived: &ArchivedMirror) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("repository".to_string(), repo.full_name.clone());
    metadata.insert("backup_date".to_string(), timestamp(Utc::now()));
    metadata.insert("default_branch".to_string(), repo.default_branch.clone());
    metadata.insert("size_bytes".to_string(), archived.size_bytes.to_string());
    if let Some(head) = &archived.info.head_commit {
        metadata.insert("head_commit".to_string(), head.clone());
    }
    metadata.insert("ref_count".to_string(), archived.info.ref_count.to_string());
    metadata
}

fn issues_metadata(repo: &Repository, total_issues: usize) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("repository".to_string(), repo.full_name.clone());
    metadata.insert("backup_date".to_string(), timestamp(Utc::now()));
    metadata.insert("content_type".to_string(), "application/json".to_string());
    metadata.insert("total_issues".to_string(), total_issues.to_string());
    metadata
}
