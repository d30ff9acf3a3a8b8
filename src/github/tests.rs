// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{GitHubClient, PER_PAGE, Repository};
use crate::error::NetworkError;

fn repo_json(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "full_name": format!("quantecon/{name}"),
        "clone_url": format!("https://github.com/quantecon/{name}.git"),
        "default_branch": "main",
        "archived": false,
        "private": false,
        "stargazers_count": 3
    })
}

#[test]
fn test_invalid_base_url() {
    let err = GitHubClient::new("ftp://example.com", "t").unwrap_err();
    assert!(matches!(err, NetworkError::InvalidUrl(_)));
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let client = GitHubClient::new("https://api.github.com/", "t").unwrap();
    assert_eq!(client.base_url(), "https://api.github.com");
}

#[test]
fn test_repository_owner() {
    let repo: Repository = serde_json::from_value(repo_json("lecture-python")).unwrap();
    assert_eq!(repo.owner(), "quantecon");
}

#[tokio::test]
async fn test_list_org_repos_follows_pages() {
    let server = MockServer::start().await;

    let first: Vec<_> = (0..PER_PAGE).map(|i| repo_json(&format!("repo-{i}"))).collect();
    Mock::given(method("GET"))
        .and(path("/orgs/quantecon/repos"))
        .and(query_param("type", "all"))
        .and(query_param("page", "1"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(first))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/orgs/quantecon/repos"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vec![repo_json("last")]))
        .expect(1)
        .mount(&server)
        .await;

    let client = GitHubClient::new(&server.uri(), "secret-token").unwrap();
    let repos = client.list_org_repos("quantecon").await.unwrap();

    assert_eq!(repos.len(), PER_PAGE + 1);
    assert_eq!(repos.last().map(|r| r.name.as_str()), Some("last"));
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/orgs/missing/repos"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&server.uri(), "t").unwrap();
    let err = client.list_org_repos("missing").await.unwrap_err();
    match err {
        NetworkError::HttpError { status, url } => {
            assert_eq!(status, 404);
            assert!(url.contains("/orgs/missing/repos"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"a list\"}"))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&server.uri(), "t").unwrap();
    let err = client.list_issues("o", "r").await.unwrap_err();
    assert!(matches!(err, NetworkError::Decode { .. }), "got {err}");
}

#[tokio::test]
async fn test_issue_fields_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .and(query_param("state", "all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "number": 42,
                "title": "Broken link",
                "html_url": "https://github.com/o/r/issues/42",
                "state": "closed",
                "user": null,
                "created_at": "2024-01-02T03:04:05Z",
                "updated_at": "2024-01-03T03:04:05Z",
                "closed_at": null,
                "labels": [{"name": "bug"}],
                "milestone": {"title": "v1"},
                "assignees": [{"login": "alice"}],
                "body": null,
                "comments": 2
            },
            {
                "number": 99,
                "title": "Add feature",
                "html_url": "https://github.com/o/r/pull/99",
                "state": "open",
                "user": {"login": "bob"},
                "created_at": "2024-01-02T03:04:05Z",
                "updated_at": "2024-01-02T03:04:05Z",
                "closed_at": null,
                "labels": [],
                "milestone": null,
                "assignees": [],
                "body": "PR body",
                "comments": 0,
                "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/99"}
            }
        ])))
        .mount(&server)
        .await;

    let client = GitHubClient::new(&server.uri(), "t").unwrap();
    let issues = client.list_issues("o", "r").await.unwrap();

    assert_eq!(issues.len(), 2);
    assert!(!issues[0].is_pull_request());
    assert!(issues[0].user.is_none());
    assert_eq!(issues[0].labels[0].name, "bug");
    assert_eq!(issues[0].comments, 2);
    assert!(issues[1].is_pull_request());
    assert!(issues[1].is_open());
}
