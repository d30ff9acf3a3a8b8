// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository selection rules.
//!
//! ```text
//! all repos
//!    |
//!    v
//! exclude_archived? ---> drop archived (count logged)
//!    |
//!    v
//! matches(name)      exact include set  OR  include regex at start of name
//!    |
//!    v
//! !is_excluded(name) exact exclude set  OR  exclude regex at start of name
//!    |
//!    v
//! FilterOutcome { matched, excluded, not_found }
//! ```
//!
//! Patterns are anchored at the start only: `lecture-` selects
//! `lecture-python` but not `old-lecture-python`, and `lecture` also selects
//! `lectures`. Add `$` for a full-name match.


use std::collections::BTreeSet;

use bon::Builder;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::BackupConfig;
use crate::error::ConfigError;
use crate::github::Repository;

/// Columns used when logging excluded repository names.
const LOG_COLUMNS: usize = 3;

/// Raw include/exclude rules, before compilation.
#[derive(Debug, Clone, Default, Builder)]
pub struct MatchRules {
    #[builder(default)]
    pub patterns: Vec<String>,
    #[builder(default)]
    pub repositories: Vec<String>,
    #[builder(default)]
    pub exclude_patterns: Vec<String>,
    #[builder(default)]
    pub exclude_repositories: Vec<String>,
    #[builder(default)]
    pub exclude_archived: bool,
}

impl From<&BackupConfig> for MatchRules {
    fn from(config: &BackupConfig) -> Self {
        Self {
            patterns: config.patterns.clone(),
            repositories: config.repositories.clone(),
            exclude_patterns: config.exclude_patterns.clone(),
            exclude_repositories: config.exclude_repositories.clone(),
            exclude_archived: config.exclude_archived,
        }
    }
}

/// Compiled, immutable selection rules.
#[derive(Debug, Clone)]
pub struct RepoMatcher {
    repositories: BTreeSet<String>,
    patterns: Vec<Regex>,
    exclude_repositories: BTreeSet<String>,
    exclude_patterns: Vec<Regex>,
    exclude_archived: bool,
}

/// Result of filtering an organization's repositories.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    /// Repositories selected for backup, in listing order.
    pub matched: Vec<Repository>,
    /// Names that matched an include rule but were removed by an exclude rule, sorted.
    pub excluded: Vec<String>,
    /// Exact include names absent from the listing, sorted.
    pub not_found: Vec<String>,
    /// Archived repositories dropped before matching.
    pub archived_skipped: usize,
}

/// Compiles each pattern anchored at the start of the name.
fn compile(key: &str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})")).map_err(|e| ConfigError::InvalidPattern {
                key: key.to_string(),
                pattern: pattern.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}

impl RepoMatcher {
    /// Compiles the rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` naming the first malformed regex.
    pub fn new(rules: MatchRules) -> Result<Self, ConfigError> {
        let matcher = Self {
            patterns: compile("patterns", &rules.patterns)?,
            exclude_patterns: compile("exclude_patterns", &rules.exclude_patterns)?,
            repositories: rules.repositories.into_iter().collect(),
            exclude_repositories: rules.exclude_repositories.into_iter().collect(),
            exclude_archived: rules.exclude_archived,
        };
        debug!(
            patterns = matcher.patterns.len(),
            repositories = matcher.repositories.len(),
            exclude_patterns = matcher.exclude_patterns.len(),
            exclude_repositories = matcher.exclude_repositories.len(),
            exclude_archived = matcher.exclude_archived,
            "compiled repository matcher"
        );
        Ok(matcher)
    }

    /// Compiles the rules found in the `backup` config section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` naming the first malformed regex.
    pub fn from_config(config: &BackupConfig) -> Result<Self, ConfigError> {
        Self::new(MatchRules::from(config))
    }

    /// True if `name` is an exact include or an include pattern matches its start.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        if self.repositories.contains(name) {
            debug!(repo = name, "matched exact name");
            return true;
        }
        if let Some(pattern) = self.patterns.iter().find(|p| p.is_match(name)) {
            debug!(repo = name, pattern = pattern.as_str(), "matched pattern");
            return true;
        }
        false
    }

    /// True if `name` is an exact exclude or an exclude pattern matches its start.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        if self.exclude_repositories.contains(name) {
            debug!(repo = name, "excluded by exact name");
            return true;
        }
        if let Some(pattern) = self.exclude_patterns.iter().find(|p| p.is_match(name)) {
            debug!(repo = name, pattern = pattern.as_str(), "excluded by pattern");
            return true;
        }
        false
    }

    #[must_use]
    pub const fn exclude_archived(&self) -> bool {
        self.exclude_archived
    }

    /// Applies archive filtering, include rules and exclude rules to a listing.
    #[must_use]
    pub fn filter(&self, all_repos: Vec<Repository>) -> FilterOutcome {
        info!(total = all_repos.len(), "found repositories");

        let mut outcome = FilterOutcome::default();
        let candidates: Vec<Repository> = if self.exclude_archived {
            let (archived, active): (Vec<_>, Vec<_>) =
                all_repos.into_iter().partition(|repo| repo.archived);
            outcome.archived_skipped = archived.len();
            info!(
                archived = archived.len(),
                remaining = active.len(),
                "excluding archived repositories"
            );
            active
        } else {
            all_repos
        };

        let seen: BTreeSet<&str> = candidates.iter().map(|repo| repo.name.as_str()).collect();
        outcome.not_found = self
            .repositories
            .iter()
            .filter(|name| !seen.contains(name.as_str()))
            .cloned()
            .collect();

        let total = candidates.len();
        let included: Vec<Repository> = candidates
            .into_iter()
            .filter(|repo| self.matches(&repo.name))
            .collect();
        info!(matched = included.len(), total, "matched repositories");

        for repo in included {
            if self.is_excluded(&repo.name) {
                outcome.excluded.push(repo.name);
            } else {
                outcome.matched.push(repo);
            }
        }
        outcome.excluded.sort();

        if !outcome.excluded.is_empty() {
            info!(
                excluded = outcome.excluded.len(),
                "excluded repositories by exclude rules:"
            );
            for row in format_columns(&outcome.excluded, LOG_COLUMNS) {
                info!("{row}");
            }
            info!(
                remaining = outcome.matched.len(),
                "repositories remaining after exclusions"
            );
        }

        for repo in &outcome.matched {
            debug!(repo = %repo.full_name, "selected repository");
        }

        if !outcome.not_found.is_empty() {
            warn!(
                "configured repositories not found (may be private or misspelled): {}",
                outcome.not_found.join(", ")
            );
        }

        outcome
    }
}

/// Lays out names in rows of `columns`, each cell padded to the longest name plus two.
#[must_use]
pub fn format_columns(names: &[String], columns: usize) -> Vec<String> {
    let Some(longest) = names.iter().map(String::len).max() else {
        return Vec::new();
    };
    let width = longest + 2;
    names
        .chunks(columns.max(1))
        .map(|row| {
            let cells: String = row.iter().map(|name| format!("{name:<width$}")).collect();
            format!("  {}", cells.trim_end())
        })
        .collect()
}
