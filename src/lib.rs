// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |           backup / report / options
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  YAML/TOML + env + flags  |
//!              '-------------+-------------'
//!                            v
//!                 backup (BackupManager)
//!                            |
//!       +---------+----------+----------+---------+
//!       v         v          v          v         v
//!    github    matcher      git      storage    issues
//!   REST API   regexes   mirror+tar  S3 (aws)   export
//!
//!   +-----------------------------------------+
//!   |  core        process (async subprocess) |
//!   +-----------------------------------------+
//!   |  foundation  error, logging             |
//!   +-----------------------------------------+
//! ```

pub mod backup;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod github;
pub mod issues;
pub mod logging;
pub mod matcher;
pub mod storage;
