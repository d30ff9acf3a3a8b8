// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Read-only statistics over stored backups.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::storage::BackupObject;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Backup statistics for an organization.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackupReport {
    pub organization: String,
    pub total_repos: usize,
    pub repos_with_backups: usize,
    pub total_backup_size: u64,
    /// Only repositories with at least one stored object.
    pub repositories: BTreeMap<String, RepoBackups>,
}

/// Stored objects of one repository.
#[derive(Debug, Clone, Serialize)]
pub struct RepoBackups {
    pub backup_count: usize,
    pub total_size: u64,
    pub latest_backup: DateTime<Utc>,
    pub backups: Vec<BackupObject>,
}

impl RepoBackups {
    /// Aggregates `backups`; `None` when the list is empty.
    #[must_use]
    pub fn from_objects(backups: Vec<BackupObject>) -> Option<Self> {
        let latest_backup = backups.iter().map(|b| b.last_modified).max()?;
        Some(Self {
            backup_count: backups.len(),
            total_size: backups.iter().map(|b| b.size).sum(),
            latest_backup,
            backups,
        })
    }
}

impl BackupReport {
    #[must_use]
    pub fn new(organization: &str, total_repos: usize) -> Self {
        Self {
            organization: organization.to_string(),
            total_repos,
            ..Self::default()
        }
    }

    /// Adds one repository's listing; empty listings are not recorded.
    pub fn add(&mut self, repo_name: &str, backups: Vec<BackupObject>) {
        if let Some(entry) = RepoBackups::from_objects(backups) {
            self.repos_with_backups += 1;
            self.total_backup_size += entry.total_size;
            self.repositories.insert(repo_name.to_string(), entry);
        }
    }

    /// Total size in GiB.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn total_size_gb(&self) -> f64 {
        self.total_backup_size as f64 / BYTES_PER_GB
    }

    /// Human-readable summary lines.
    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Organization: {}", self.organization),
            format!("Total repositories: {}", self.total_repos),
            format!("Repositories with backups: {}", self.repos_with_backups),
            format!("Total backup size: {:.2} GB", self.total_size_gb()),
        ];
        for (name, entry) in &self.repositories {
            lines.push(format!(
                "  {name}: {} backups, {} bytes, latest {}",
                entry.backup_count,
                entry.total_size,
                crate::issues::timestamp(entry.latest_backup)
            ));
        }
        lines
    }
}
