// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Object key layout.
//!
//! ```text
//! {prefix}{name}/{name}-{YYYYMMDD}.tar.gz
//! {prefix}{name}/{name}-issues-{YYYYMMDD}.json
//! ```

use chrono::{DateTime, Utc};

/// UTC calendar day as `YYYYMMDD`.
#[must_use]
pub fn date_stamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

#[must_use]
pub fn archive_key(name: &str, date: &str) -> String {
    format!("{name}/{name}-{date}.tar.gz")
}

#[must_use]
pub fn issues_key(name: &str, date: &str) -> String {
    format!("{name}/{name}-issues-{date}.json")
}
