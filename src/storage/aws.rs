// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! S3 access through the `aws s3api` command line.
//!
//! ```text
//! aws --region R [--endpoint-url E] --output json s3api
//!   head-object      --bucket B --key K                 --> {"ContentLength": n}
//!   put-object       --bucket B --key K --body F
//!                    --metadata {json} --content-type T
//!                    --checksum-algorithm SHA256
//!   list-objects-v2  --bucket B --prefix P --no-paginate
//!                    [--continuation-token T]            --> {"Contents": [...]}
//! ```
//!
//! Credentials come from the usual AWS environment/profile chain.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{BackupObject, ListPage, ObjectStore, PutRequest};
use crate::config::S3Config;
use crate::core::process::{ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::{ConfigError, StorageError};

/// [`ObjectStore`] backed by the AWS CLI.
#[derive(Debug, Clone)]
pub struct AwsCliStore {
    program: PathBuf,
    bucket: String,
    region: String,
    endpoint_url: Option<String>,
    cancel: CancellationToken,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HeadObjectOutput {
    content_length: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListObjectsOutput {
    #[serde(default)]
    contents: Vec<ListedObject>,
    #[serde(default)]
    is_truncated: bool,
    next_continuation_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ListedObject {
    key: String,
    size: u64,
    last_modified: DateTime<Utc>,
}

/// True if CLI error text names a missing bucket.
#[must_use]
pub fn is_missing_bucket(message: &str) -> bool {
    message.to_ascii_lowercase().contains("nosuchbucket")
}

/// True if CLI error text describes a missing object.
#[must_use]
pub fn is_not_found(message: &str) -> bool {
    let m = message.to_ascii_lowercase();
    m.contains("(404)")
        || m.contains("not found")
        || m.contains("nosuchkey")
        || m.contains("does not exist")
}

/// Parses `head-object` JSON output into the object size.
///
/// # Errors
///
/// Returns `StorageError::InvalidResponse` if the output is not the expected JSON.
pub fn parse_head_output(stdout: &str) -> Result<u64, StorageError> {
    serde_json::from_str::<HeadObjectOutput>(stdout)
        .map(|head| head.content_length)
        .map_err(|e| StorageError::InvalidResponse {
            operation: "head-object".to_string(),
            message: e.to_string(),
        })
}

/// Parses `list-objects-v2` JSON output into one page.
///
/// Empty output (no matching objects) is an empty last page.
///
/// # Errors
///
/// Returns `StorageError::InvalidResponse` if the output is not the expected JSON.
pub fn parse_list_output(stdout: &str) -> Result<ListPage, StorageError> {
    if stdout.trim().is_empty() {
        return Ok(ListPage::default());
    }

    let listing: ListObjectsOutput =
        serde_json::from_str(stdout).map_err(|e| StorageError::InvalidResponse {
            operation: "list-objects-v2".to_string(),
            message: e.to_string(),
        })?;

    Ok(ListPage {
        objects: listing
            .contents
            .into_iter()
            .map(|object| BackupObject {
                key: object.key,
                size: object.size,
                last_modified: object.last_modified,
            })
            .collect(),
        next_token: listing
            .next_continuation_token
            .filter(|_| listing.is_truncated),
    })
}

impl AwsCliStore {
    /// Creates a store for the configured bucket.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` when the bucket is not configured.
    pub fn new(
        program: impl Into<PathBuf>,
        s3: &S3Config,
        cancel: CancellationToken,
    ) -> Result<Self, ConfigError> {
        let bucket = s3.require_bucket()?.to_string();

        Ok(Self {
            program: program.into(),
            bucket,
            region: s3.region.trim().to_string(),
            endpoint_url: s3
                .endpoint_url
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            cancel,
        })
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// `aws` invocation with global options, ready for an `s3api` operation.
    fn s3api(&self, operation: &str) -> ProcessBuilder {
        let mut builder = ProcessBuilder::new(&self.program).name("aws");
        if !self.region.is_empty() {
            builder = builder.args(["--region", self.region.as_str()]);
        }
        if let Some(endpoint) = &self.endpoint_url {
            builder = builder.args(["--endpoint-url", endpoint.as_str()]);
        }
        builder
            .args(["--output", "json", "s3api", operation])
            .args(["--bucket", self.bucket.as_str()])
            .capture_output()
            .flag(ProcessFlags::ALLOW_FAILURE)
    }

    async fn run(
        &self,
        builder: ProcessBuilder,
        operation: &str,
        key: &str,
    ) -> Result<ProcessOutput, StorageError> {
        builder
            .run_with_cancellation(self.cancel.clone())
            .await
            .map_err(|e| StorageError::CommandFailed {
                operation: operation.to_string(),
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    fn command_failed(operation: &str, key: &str, output: &ProcessOutput) -> StorageError {
        let message = if output.stderr().trim().is_empty() {
            format!("exit code {}", output.exit_code())
        } else {
            output.stderr().trim().to_string()
        };
        StorageError::CommandFailed {
            operation: operation.to_string(),
            key: key.to_string(),
            message,
        }
    }

    async fn head_object(&self, key: &str) -> Result<Option<u64>, StorageError> {
        let builder = self.s3api("head-object").args(["--key", key]);
        let output = self.run(builder, "head-object", key).await?;

        if output.success() {
            return parse_head_output(output.stdout()).map(Some);
        }
        if is_missing_bucket(output.stderr()) {
            return Err(StorageError::NotFound(self.bucket.clone()));
        }
        if is_not_found(output.stderr()) {
            return Ok(None);
        }
        Err(Self::command_failed("head-object", key, &output))
    }

    async fn put_object(&self, request: PutRequest<'_>) -> Result<(), StorageError> {
        let metadata =
            serde_json::to_string(request.metadata).map_err(|e| StorageError::InvalidResponse {
                operation: "put-object".to_string(),
                message: e.to_string(),
            })?;

        let builder = self
            .s3api("put-object")
            .args(["--key", request.key])
            .arg("--body")
            .arg(request.path)
            .args(["--metadata", metadata.as_str()])
            .args(["--content-type", request.content_type])
            .args(["--checksum-algorithm", "SHA256"]);
        let output = self.run(builder, "put-object", request.key).await?;

        if output.success() {
            Ok(())
        } else {
            Err(Self::command_failed("put-object", request.key, &output))
        }
    }

    async fn list_objects(
        &self,
        prefix: &str,
        token: Option<&str>,
    ) -> Result<ListPage, StorageError> {
        let mut builder = self
            .s3api("list-objects-v2")
            .args(["--prefix", prefix, "--no-paginate"]);
        if let Some(token) = token {
            builder = builder.args(["--continuation-token", token]);
        }
        let output = self.run(builder, "list-objects-v2", prefix).await?;

        if output.success() {
            parse_list_output(output.stdout())
        } else if is_missing_bucket(output.stderr()) {
            Err(StorageError::NotFound(self.bucket.clone()))
        } else {
            Err(Self::command_failed("list-objects-v2", prefix, &output))
        }
    }
}

impl ObjectStore for AwsCliStore {
    fn head<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<u64>, StorageError>> {
        self.head_object(key).boxed()
    }

    fn put<'a>(&'a self, request: PutRequest<'a>) -> BoxFuture<'a, Result<(), StorageError>> {
        self.put_object(request).boxed()
    }

    fn list_page<'a>(
        &'a self,
        prefix: &'a str,
        token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<ListPage, StorageError>> {
        self.list_objects(prefix, token).boxed()
    }
}
