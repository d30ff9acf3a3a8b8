// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mirror inspection using gix.
//!
//! ```text
//! query.rs --> gix::open --> bare repo (no subprocess)
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::GitError;

/// Facts recorded about a cloned mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorInfo {
    /// Commit HEAD points at; `None` for an empty repository.
    pub head_commit: Option<String>,
    pub ref_count: usize,
}

fn invalid(path: &Path, message: impl ToString) -> GitError {
    GitError::InvalidMirror {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Opens the repository at `path` and reads HEAD and the reference count.
///
/// # Errors
///
/// Returns `GitError::InvalidMirror` if `path` is not a readable repository.
pub fn read_mirror(path: &Path) -> Result<MirrorInfo, GitError> {
    let repo = gix::open(path).map_err(|e| invalid(path, e))?;

    let head_commit = repo
        .head()
        .map_err(|e| invalid(path, e))?
        .id()
        .map(|id| id.to_string());

    let ref_count = repo
        .references()
        .map_err(|e| invalid(path, e))?
        .all()
        .map_err(|e| invalid(path, e))?
        .filter_map(Result::ok)
        .count();

    debug!(
        path = %path.display(),
        head = head_commit.as_deref().unwrap_or("(unborn)"),
        refs = ref_count,
        "inspected mirror"
    );
    Ok(MirrorInfo {
        head_commit,
        ref_count,
    })
}

/// [`read_mirror`] on the blocking pool.
///
/// # Errors
///
/// Returns `GitError::InvalidMirror` if inspection fails.
pub async fn inspect_mirror(path: &Path) -> Result<MirrorInfo, GitError> {
    let owned: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || read_mirror(&owned))
        .await
        .map_err(|e| invalid(path, e))?
}
