// repo-vault: Organization Repository Backup Tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{IssueExport, IssueExporter, IssueRecord};
use crate::github::{GitHubClient, Issue, Repository};

fn issue(number: u64, state: &str) -> Issue {
    serde_json::from_value(json!({
        "number": number,
        "title": format!("Issue {number}"),
        "html_url": format!("https://github.com/o/r/issues/{number}"),
        "state": state,
        "user": {"login": "alice"},
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-02T10:00:00Z",
        "closed_at": null,
        "labels": [],
        "milestone": null,
        "assignees": [],
        "body": "text",
        "comments": 0
    }))
    .unwrap()
}

fn repo() -> Repository {
    Repository {
        name: "r".to_string(),
        full_name: "o/r".to_string(),
        clone_url: "https://github.com/o/r.git".to_string(),
        default_branch: "main".to_string(),
        archived: false,
        private: false,
    }
}

#[test]
fn test_export_sorted_by_number_with_counts() {
    let records = vec![
        IssueRecord::new(issue(10, "closed"), Vec::new()),
        IssueRecord::new(issue(5, "open"), Vec::new()),
    ];
    let exported_at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();

    let export = IssueExport::new("o/r", exported_at, records);

    let numbers: Vec<u64> = export.issues.iter().map(|i| i.number).collect();
    assert_eq!(numbers, vec![5, 10]);
    assert_eq!(export.metadata.total_issues, 2);
    assert_eq!(export.metadata.open_issues, 1);
    assert_eq!(export.metadata.closed_issues, 1);
    assert_eq!(export.metadata.exported_at, "2026-01-15T12:00:00Z");
}

#[test]
fn test_record_nulls_for_missing_accounts() {
    let mut deleted = issue(7, "closed");
    deleted.user = None;
    let record = IssueRecord::new(deleted, Vec::new());

    let value = serde_json::to_value(&record).unwrap();
    assert!(value["author"].is_null());
    assert!(value["closed_by"].is_null());
    assert!(value["closed_at"].is_null());
    assert_eq!(value["created_at"], "2024-05-01T10:00:00Z");
    assert_eq!(value["comment_count"], 0);
}

#[test]
fn test_save_to_file_keeps_unicode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("issues.json");
    let mut item = issue(1, "open");
    item.title = "Überprüfung 数値".to_string();
    let export = IssueExport::new("o/r", Utc::now(), vec![IssueRecord::new(item, Vec::new())]);

    export.save_to_file(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Überprüfung 数値"));
    assert!(text.contains("\n  \"metadata\""));
}

#[tokio::test]
async fn test_export_skips_pull_requests_and_fetches_comments() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "number": 99,
                "title": "A pull request",
                "html_url": "https://github.com/o/r/pull/99",
                "state": "open",
                "user": {"login": "bob"},
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-01T10:00:00Z",
                "closed_at": null,
                "labels": [],
                "milestone": null,
                "assignees": [],
                "body": null,
                "comments": 0,
                "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/99"}
            },
            {
                "number": 42,
                "title": "Real issue",
                "html_url": "https://github.com/o/r/issues/42",
                "state": "closed",
                "user": {"login": "alice"},
                "created_at": "2024-05-01T10:00:00Z",
                "updated_at": "2024-05-03T10:00:00Z",
                "closed_at": "2024-05-03T10:00:00Z",
                "labels": [{"name": "bug"}],
                "milestone": {"title": "v2"},
                "assignees": [{"login": "carol"}],
                "body": "Steps to reproduce",
                "comments": 1
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 42,
            "title": "Real issue",
            "html_url": "https://github.com/o/r/issues/42",
            "state": "closed",
            "user": {"login": "alice"},
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-03T10:00:00Z",
            "closed_at": "2024-05-03T10:00:00Z",
            "closed_by": {"login": "dave"},
            "labels": [{"name": "bug"}],
            "milestone": {"title": "v2"},
            "assignees": [{"login": "carol"}],
            "body": "Steps to reproduce",
            "comments": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/o/r/issues/42/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "user": null, "created_at": "2024-05-02T10:00:00Z", "body": "Confirmed"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = GitHubClient::new(&server.uri(), "t").unwrap();
    let export = IssueExporter::new(&client).export(&repo()).await.unwrap();

    assert_eq!(export.total_issues(), 1);
    let record = &export.issues[0];
    assert_eq!(record.number, 42);
    assert_eq!(record.closed_by.as_deref(), Some("dave"));
    assert_eq!(record.labels, vec!["bug"]);
    assert_eq!(record.milestone.as_deref(), Some("v2"));
    assert_eq!(record.assignees, vec!["carol"]);
    assert_eq!(record.comment_count, 1);
    assert_eq!(record.comments[0].id, 7);
    assert!(record.comments[0].author.is_none());
    assert_eq!(export.metadata.repo, "o/r");
    assert_eq!(export.metadata.closed_issues, 1);
}
