// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mirror clone and archive.
//!
//! ```text
//!          Archiver (trait)
//!                |
//!                v
//!         GitTarArchiver
//!   ,-----------------------------,
//!   | mirror.rs   git clone       |  CLI, token in URL (masked)
//!   |             --mirror        |
//!   | query.rs    gix::open       |  read-only: HEAD, ref count
//!   | mirror.rs   tar -czf        |  CLI
//!   '-----------------------------'
//!                |
//!                v
//!   work_dir/{name}.tar.gz  + MirrorInfo
//! ```
//!
//! **`gix`** inspects the mirror in-process; writes go through the git CLI.

pub mod mirror;
pub mod query;


use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ToolsConfig;
use crate::error::GitError;
use crate::github::Repository;

pub use mirror::authenticated_url;
pub use query::MirrorInfo;

/// Result of archiving one repository.
#[derive(Debug, Clone)]
pub struct ArchivedMirror {
    /// Path of the `.tar.gz` file inside the work directory.
    pub archive_path: PathBuf,
    pub size_bytes: u64,
    pub info: MirrorInfo,
}

/// Produces a compressed mirror archive of a repository.
pub trait Archiver: Send + Sync {
    /// Clones `repo` into `work_dir` and archives it there.
    fn archive<'a>(
        &'a self,
        repo: &'a Repository,
        work_dir: &'a Path,
    ) -> BoxFuture<'a, Result<ArchivedMirror, GitError>>;
}

/// [`Archiver`] using the git and tar command line tools.
#[derive(Debug, Clone)]
pub struct GitTarArchiver {
    git: PathBuf,
    tar: PathBuf,
    token: String,
    timeout: Option<Duration>,
    cancel: CancellationToken,
}

impl GitTarArchiver {
    #[must_use]
    pub fn new(tools: &ToolsConfig, token: impl Into<String>, cancel: CancellationToken) -> Self {
        Self {
            git: tools.git.clone(),
            tar: tools.tar.clone(),
            token: token.into(),
            timeout: None,
            cancel,
        }
    }

    /// Applies a timeout to each clone and tar subprocess.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn run(&self, repo: &Repository, work_dir: &Path) -> Result<ArchivedMirror, GitError> {
        let mirror_dir = work_dir.join(&repo.name);
        let archive_path = work_dir.join(format!("{}.tar.gz", repo.name));

        info!(repo = %repo.full_name, "cloning mirror");
        mirror::clone_mirror(
            &self.git,
            &repo.clone_url,
            &self.token,
            &mirror_dir,
            self.timeout,
            &self.cancel,
        )
        .await?;

        let info = query::inspect_mirror(&mirror_dir).await?;

        info!(repo = %repo.full_name, "creating archive");
        mirror::create_archive(
            &self.tar,
            work_dir,
            &repo.name,
            &archive_path,
            self.timeout,
            &self.cancel,
        )
        .await?;

        let size_bytes = tokio::fs::metadata(&archive_path)
            .await
            .map_err(|e| GitError::ArchiveFailed {
                path: archive_path.display().to_string(),
                message: e.to_string(),
            })?
            .len();

        info!(
            repo = %repo.full_name,
            bytes = size_bytes,
            refs = info.ref_count,
            "archive ready"
        );
        Ok(ArchivedMirror {
            archive_path,
            size_bytes,
            info,
        })
    }
}

impl Archiver for GitTarArchiver {
    fn archive<'a>(
        &'a self,
        repo: &'a Repository,
        work_dir: &'a Path,
    ) -> BoxFuture<'a, Result<ArchivedMirror, GitError>> {
        self.run(repo, work_dir).boxed()
    }
}
