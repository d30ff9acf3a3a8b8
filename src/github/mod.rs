// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub REST client.
//!
//! ```text
//! GitHubClient::new(api_url, token)
//!   list_org_repos(org)             GET /orgs/{org}/repos?type=all
//!   list_issues(owner, repo)        GET /repos/{o}/{r}/issues?state=all
//!   get_issue(owner, repo, n)       GET /repos/{o}/{r}/issues/{n}
//!   list_comments(owner, repo, n)   GET /repos/{o}/{r}/issues/{n}/comments
//!
//! Pagination: &per_page=100&page=1,2,... until a page is short
//! Headers:    Authorization: Bearer, Accept, User-Agent
//! ```

pub mod types;

#[cfg(test)]
mod tests;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::NetworkError;

pub use types::{Issue, IssueComment, Label, Milestone, Repository, User};

/// Items requested per page.
pub const PER_PAGE: usize = 100;

const ACCEPT: &str = "application/vnd.github+json";

/// Authenticated client for one GitHub API endpoint.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GitHubClient {
    /// Creates a client for `api_url` (e.g. `https://api.github.com`).
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if the URL is not http(s), or a
    /// reqwest error if the HTTP client cannot be built.
    pub fn new(api_url: &str, token: impl Into<String>) -> Result<Self, NetworkError> {
        let base_url = api_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(NetworkError::InvalidUrl(api_url.to_string()));
        }

        let client = Client::builder()
            .user_agent(format!("repo-vault/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
        })
    }

    /// The bearer token, needed for authenticated clone URLs.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists every repository of `org`, private ones included.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn list_org_repos(&self, org: &str) -> Result<Vec<Repository>, NetworkError> {
        self.get_paginated(&format!("/orgs/{org}/repos?type=all"))
            .await
    }

    /// Lists all issues (open and closed) of a repository, pull requests included.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn list_issues(&self, owner: &str, repo: &str) -> Result<Vec<Issue>, NetworkError> {
        self.get_paginated(&format!("/repos/{owner}/{repo}/issues?state=all"))
            .await
    }

    /// Fetches one issue with its full detail (including `closed_by`).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn get_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Issue, NetworkError> {
        let url = format!("{}/repos/{owner}/{repo}/issues/{number}", self.base_url);
        self.get_json(&url).await
    }

    /// Lists every comment on one issue.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status or bad JSON.
    pub async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<IssueComment>, NetworkError> {
        self.get_paginated(&format!("/repos/{owner}/{repo}/issues/{number}/comments"))
            .await
    }

    /// Follows page numbers until a page comes back with fewer than [`PER_PAGE`] items.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, NetworkError> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();
        let mut page = 1_u32;

        loop {
            let url = format!(
                "{}{path}{separator}per_page={PER_PAGE}&page={page}",
                self.base_url
            );
            let batch: Vec<T> = self.get_json(&url).await?;
            let count = batch.len();
            trace!(page, count, "fetched page");
            items.extend(batch);

            if count < PER_PAGE {
                break;
            }
            page += 1;
        }

        debug!(path, total = items.len(), "pagination complete");
        Ok(items)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NetworkError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| NetworkError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}
