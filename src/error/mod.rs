// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          VaultError (<= 24 bytes)       command layer (cmd/*)
//!                 |
//!   +--------+----+-----+---------+
//!   |        |          |         |
//!   v        v          v         v
//! Bailed  Network    Config    Process
//! Box<str>  Box       Box        Box
//!
//! Module errors (returned directly by their modules):
//!   Network  HttpError, Reqwest, InvalidUrl, Decode
//!   Storage  CommandFailed, NotFound, InvalidResponse, SizeMismatch
//!   Config   ParseError, MissingKey, InvalidValue, InvalidPattern, NotFound
//!   Process  ExecutableNotFound, SpawnFailed, NonZeroExit, Timeout, Interrupted
//!   Git      CloneFailed, ArchiveFailed, InvalidMirror
//!   Fs       IoError
//!
//! Storage, Git and Fs failures end up as reason strings in BackupResults,
//! so they never reach VaultError.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`VaultError`].
pub type VaultResult<T> = std::result::Result<T, VaultError>;

/// Top-level error for command preflight and setup.
///
/// Sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// GitHub API or other HTTP operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),
}

/// Create a fatal [`VaultError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> VaultError {
    VaultError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for VaultError {
                fn from(err: $error) -> Self {
                    VaultError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    NetworkError => Network,
    ConfigError => Config,
    ProcessError => Process,
}

// --- Network Errors ---

/// HTTP / GitHub API errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Response body did not match the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

// --- Storage Errors ---

/// Object storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage command exited unsuccessfully.
    #[error("{operation} failed for '{key}': {message}")]
    CommandFailed {
        operation: String,
        key: String,
        message: String,
    },

    /// Bucket does not exist or is not accessible.
    #[error("bucket not found: {0}")]
    NotFound(String),

    /// Storage command produced output that could not be parsed.
    #[error("unexpected {operation} response: {message}")]
    InvalidResponse { operation: String, message: String },

    /// Uploaded object size differs from the local file.
    #[error("size mismatch for '{key}': remote={remote} bytes, local={local} bytes")]
    SizeMismatch { key: String, remote: u64, local: u64 },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// Regular expression failed to compile.
    #[error("invalid pattern '{pattern}' in '{key}': {message}")]
    InvalidPattern {
        key: String,
        pattern: String,
        message: String,
    },

    /// Configuration file not found.
    #[error("config file not found: {0}")]
    NotFound(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Process was interrupted by cancellation.
    #[error("process '{command}' was interrupted")]
    Interrupted { command: String },
}

// --- Git Errors ---

/// Mirror clone and archive errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Mirror clone failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// Archive creation failed.
    #[error("failed to archive {path}: {message}")]
    ArchiveFailed { path: String, message: String },

    /// Cloned directory is not a usable repository.
    #[error("invalid mirror at {path}: {message}")]
    InvalidMirror { path: String, message: String },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
