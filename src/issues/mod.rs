// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Issue tracker export.
//!
//! ```text
//! IssueExporter::export(repo)
//!   list_issues(state=all)          (paginated)
//!     skip items with pull_request
//!     closed without closed_by --> get_issue(n)
//!     comments > 0             --> list_comments(n)
//!   sort by number
//!   --> IssueExport { metadata { totals }, issues [...] }
//!
//! save_to_file(export, path)  pretty JSON, UTF-8 kept as-is
//! ```

#[cfg(test)]
mod tests;

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{FsError, NetworkError};
use crate::github::{GitHubClient, Issue, IssueComment, Repository, User};

/// Exported issue document.
#[derive(Debug, Clone, Serialize)]
pub struct IssueExport {
    pub metadata: ExportMetadata,
    pub issues: Vec<IssueRecord>,
}

/// Summary block at the top of an export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportMetadata {
    pub repo: String,
    pub exported_at: String,
    pub total_issues: usize,
    pub open_issues: usize,
    pub closed_issues: usize,
}

/// One issue as written to the export.
#[derive(Debug, Clone, Serialize)]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: String,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub closed_at: Option<String>,
    pub closed_by: Option<String>,
    pub labels: Vec<String>,
    pub milestone: Option<String>,
    pub assignees: Vec<String>,
    pub body: Option<String>,
    pub comment_count: usize,
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentRecord {
    pub id: u64,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub body: Option<String>,
}

/// RFC 3339 timestamp with a `Z` suffix.
#[must_use]
pub fn timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn login(user: Option<&User>) -> Option<String> {
    user.map(|u| u.login.clone())
}

impl From<IssueComment> for CommentRecord {
    fn from(comment: IssueComment) -> Self {
        Self {
            id: comment.id,
            author: login(comment.user.as_ref()),
            created_at: comment.created_at.map(timestamp),
            body: comment.body,
        }
    }
}

impl IssueRecord {
    /// Builds the record from an issue and its fetched comments.
    #[must_use]
    pub fn new(issue: Issue, comments: Vec<IssueComment>) -> Self {
        let comments: Vec<CommentRecord> = comments.into_iter().map(Into::into).collect();
        Self {
            number: issue.number,
            author: login(issue.user.as_ref()),
            closed_by: login(issue.closed_by.as_ref()),
            title: issue.title,
            url: issue.html_url,
            state: issue.state,
            created_at: issue.created_at.map(timestamp),
            updated_at: issue.updated_at.map(timestamp),
            closed_at: issue.closed_at.map(timestamp),
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            milestone: issue.milestone.map(|m| m.title),
            assignees: issue.assignees.into_iter().map(|a| a.login).collect(),
            body: issue.body,
            comment_count: comments.len(),
            comments,
        }
    }
}

impl IssueExport {
    /// Sorts records by number and computes the summary counts.
    #[must_use]
    pub fn new(repo: &str, exported_at: DateTime<Utc>, mut issues: Vec<IssueRecord>) -> Self {
        issues.sort_by_key(|issue| issue.number);
        let open_issues = issues.iter().filter(|i| i.state == "open").count();
        Self {
            metadata: ExportMetadata {
                repo: repo.to_string(),
                exported_at: timestamp(exported_at),
                total_issues: issues.len(),
                open_issues,
                closed_issues: issues.len() - open_issues,
            },
            issues,
        }
    }

    #[must_use]
    pub const fn total_issues(&self) -> usize {
        self.metadata.total_issues
    }

    /// Writes the export as pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns `FsError::IoError` if the directory or file cannot be written.
    pub fn save_to_file(&self, path: &Path) -> Result<(), FsError> {
        let io_error = |source: std::io::Error| FsError::IoError {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let file = std::fs::File::create(path).map_err(io_error)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| io_error(e.into()))?;
        std::io::Write::flush(&mut writer).map_err(io_error)?;

        debug!(path = %path.display(), "saved issues export");
        Ok(())
    }
}

/// Exports issues through the GitHub API.
#[derive(Debug, Clone, Copy)]
pub struct IssueExporter<'a> {
    client: &'a GitHubClient,
}

impl<'a> IssueExporter<'a> {
    #[must_use]
    pub const fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Fetches every issue (not pull request) of `repo` with its comments.
    ///
    /// # Errors
    ///
    /// Returns the first API error encountered.
    pub async fn export(&self, repo: &Repository) -> Result<IssueExport, NetworkError> {
        let owner = repo.owner();
        info!(repo = %repo.full_name, "exporting issues");

        let mut records = Vec::new();
        for mut issue in self.client.list_issues(owner, &repo.name).await? {
            if issue.is_pull_request() {
                continue;
            }

            if !issue.is_open() && issue.closed_by.is_none() {
                issue.closed_by = self
                    .client
                    .get_issue(owner, &repo.name, issue.number)
                    .await?
                    .closed_by;
            }

            let comments = if issue.comments > 0 {
                self.client
                    .list_comments(owner, &repo.name, issue.number)
                    .await?
            } else {
                Vec::new()
            };

            records.push(IssueRecord::new(issue, comments));
        }

        let export = IssueExport::new(&repo.full_name, Utc::now(), records);
        info!(
            repo = %repo.full_name,
            total = export.metadata.total_issues,
            open = export.metadata.open_issues,
            closed = export.metadata.closed_issues,
            "exported issues"
        );
        Ok(export)
    }
}
