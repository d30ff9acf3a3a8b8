// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Object storage for backup archives.
//!
//! ```text
//! ArchiveUploader<S: ObjectStore>          prefix "backups/" + key
//!   exists(key)        head --> Some(size) | None
//!   upload(file, key)  put (metadata, SHA-256) --> head --> size == local?
//!   list_backups(repo) list_page ... until next_token is None
//!
//! ObjectStore
//!   AwsCliStore   aws s3api head-object / put-object / list-objects-v2
//!   MemoryStore   in-process map (tests, `test-util` feature)
//! ```

pub mod aws;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;


use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use futures_util::future::BoxFuture;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::StorageError;

pub use aws::AwsCliStore;
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryStore;

/// User metadata attached to an uploaded object.
pub type Metadata = BTreeMap<String, String>;

/// One stored backup object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupObject {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}

/// One page of a prefix listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub objects: Vec<BackupObject>,
    /// Token for the next page; `None` on the last page.
    pub next_token: Option<String>,
}

/// Upload parameters for [`ObjectStore::put`].
#[derive(Debug, Clone, Copy)]
pub struct PutRequest<'a> {
    pub path: &'a Path,
    pub key: &'a str,
    pub metadata: &'a Metadata,
    pub content_type: &'a str,
}

/// Minimal blob-store interface used by the uploader.
///
/// Keys passed in are full object keys (prefix already applied).
pub trait ObjectStore: Send + Sync {
    /// Returns the object size, or `None` if the object does not exist.
    fn head<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<u64>, StorageError>>;

    /// Uploads a local file with metadata and a SHA-256 checksum request.
    fn put<'a>(&'a self, request: PutRequest<'a>) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Lists one page of objects under `prefix`.
    fn list_page<'a>(
        &'a self,
        prefix: &'a str,
        token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<ListPage, StorageError>>;
}

/// Normalizes a key prefix to end in exactly one `/`; blank stays empty.
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// Content type derived from the key's extension.
#[must_use]
pub fn content_type_for(key: &str) -> &'static str {
    if key.ends_with(".json") {
        "application/json"
    } else if key.ends_with(".tar.gz") || key.ends_with(".tgz") {
        "application/gzip"
    } else {
        "application/octet-stream"
    }
}

/// Uploads, probes and lists backups under a fixed key prefix.
#[derive(Debug)]
pub struct ArchiveUploader<S> {
    store: S,
    prefix: String,
}

impl<S: ObjectStore> ArchiveUploader<S> {
    pub fn new(store: S, prefix: &str) -> Self {
        Self {
            store,
            prefix: normalize_prefix(prefix),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Key with the prefix applied.
    #[must_use]
    pub fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }

    /// Checks whether `key` already exists.
    ///
    /// # Errors
    ///
    /// Returns the store error for any failure other than "not found".
    pub async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let full_key = self.full_key(key);
        let found = self.store.head(&full_key).await?.is_some();
        debug!(key = %full_key, found, "checked backup");
        Ok(found)
    }

    /// Uploads `local` to `key` and verifies the stored size.
    ///
    /// Returns `false` on any failure, which is logged.
    pub async fn upload(&self, local: &Path, key: &str, metadata: &Metadata) -> bool {
        match self.try_upload(local, key, metadata).await {
            Ok(bytes) => {
                info!(key = %self.full_key(key), bytes, "uploaded and verified");
                true
            }
            Err(e) => {
                error!(key = %self.full_key(key), error = %e, "upload failed");
                false
            }
        }
    }

    async fn try_upload(
        &self,
        local: &Path,
        key: &str,
        metadata: &Metadata,
    ) -> Result<u64, StorageError> {
        let full_key = self.full_key(key);
        let local_size = tokio::fs::metadata(local)
            .await
            .map_err(|e| StorageError::CommandFailed {
                operation: "stat".to_string(),
                key: local.display().to_string(),
                message: e.to_string(),
            })?
            .len();

        info!(key = %full_key, bytes = local_size, "uploading");
        self.store
            .put(PutRequest {
                path: local,
                key: &full_key,
                metadata,
                content_type: content_type_for(key),
            })
            .await?;

        let remote = self
            .store
            .head(&full_key)
            .await?
            .ok_or_else(|| StorageError::InvalidResponse {
                operation: "head-object".to_string(),
                message: format!("'{full_key}' missing right after upload"),
            })?;

        if remote != local_size {
            return Err(StorageError::SizeMismatch {
                key: full_key,
                remote,
                local: local_size,
            });
        }
        Ok(remote)
    }

    /// Lists every backup object stored for `repo_name`.
    ///
    /// Errors are logged and yield an empty list.
    pub async fn list_backups(&self, repo_name: &str) -> Vec<BackupObject> {
        let prefix = self.full_key(&format!("{repo_name}/"));
        let mut objects = Vec::new();
        let mut token: Option<String> = None;

        loop {
            match self.store.list_page(&prefix, token.as_deref()).await {
                Ok(page) => {
                    objects.extend(page.objects);
                    match page.next_token {
                        Some(next) => token = Some(next),
                        None => break,
                    }
                }
                Err(e) => {
                    error!(prefix = %prefix, error = %e, "failed to list backups");
                    return Vec::new();
                }
            }
        }

        debug!(prefix = %prefix, count = objects.len(), "listed backups");
        objects
    }
}
