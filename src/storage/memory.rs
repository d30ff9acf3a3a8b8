// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! In-process [`ObjectStore`] for dry tests and tooling.
//!
//! Records sizes and metadata only; file contents are not kept.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use super::{BackupObject, ListPage, Metadata, ObjectStore, PutRequest};
use crate::error::StorageError;

/// One stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub size: u64,
    pub metadata: Metadata,
    pub content_type: String,
    pub last_modified: DateTime<Utc>,
}

/// Map-backed store with fixed-size listing pages.
#[derive(Debug)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    page_size: usize,
    puts: Mutex<usize>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            page_size: 1000,
            puts: Mutex::new(0),
        }
    }

    /// Sets the number of objects per listing page.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores an object directly, bypassing `put`.
    pub fn insert(&self, key: &str, size: u64, last_modified: DateTime<Utc>) {
        self.lock().insert(
            key.to_string(),
            StoredObject {
                size,
                metadata: Metadata::new(),
                content_type: String::new(),
                last_modified,
            },
        );
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().get(key).cloned()
    }

    /// All keys in lexical order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Number of `put` calls so far.
    #[must_use]
    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn page(&self, prefix: &str, token: Option<&str>) -> Result<ListPage, StorageError> {
        let start = match token {
            Some(t) => t.parse::<usize>().map_err(|e| StorageError::InvalidResponse {
                operation: "list".to_string(),
                message: format!("bad continuation token '{t}': {e}"),
            })?,
            None => 0,
        };

        let matching: Vec<BackupObject> = self
            .lock()
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, object)| BackupObject {
                key: key.clone(),
                size: object.size,
                last_modified: object.last_modified,
            })
            .collect();

        let end = start.saturating_add(self.page_size).min(matching.len());
        let objects = matching.get(start..end).map(<[_]>::to_vec).unwrap_or_default();
        Ok(ListPage {
            objects,
            next_token: (end < matching.len()).then(|| end.to_string()),
        })
    }
}

impl ObjectStore for MemoryStore {
    fn head<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<u64>, StorageError>> {
        let size = self.lock().get(key).map(|object| object.size);
        async move { Ok(size) }.boxed()
    }

    fn put<'a>(&'a self, request: PutRequest<'a>) -> BoxFuture<'a, Result<(), StorageError>> {
        async move {
            let size = tokio::fs::metadata(request.path)
                .await
                .map_err(|e| StorageError::CommandFailed {
                    operation: "put".to_string(),
                    key: request.key.to_string(),
                    message: e.to_string(),
                })?
                .len();

            *self.puts.lock().unwrap_or_else(PoisonError::into_inner) += 1;
            self.lock().insert(
                request.key.to_string(),
                StoredObject {
                    size,
                    metadata: request.metadata.clone(),
                    content_type: request.content_type.to_string(),
                    last_modified: Utc::now(),
                },
            );
            Ok(())
        }
        .boxed()
    }

    fn list_page<'a>(
        &'a self,
        prefix: &'a str,
        token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<ListPage, StorageError>> {
        let page = self.page(prefix, token);
        async move { page }.boxed()
    }
}
