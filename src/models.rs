//! Domain records and wire shapes for the task/comment backend.
//!
//! This module defines the `Task` and `Comment` records as the backend
//! serves them, the request/response envelopes of the REST contract, and
//! the partial-update payloads used for PUT requests.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Task completion status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// A task record as served by the backend.
///
/// `id` and both timestamps are server-assigned. `comments_count` is a
/// server-computed aggregate cached on the record for list display; the
/// client never mutates it, only refreshes it by reloading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub comments_count: i64,
}

/// A comment attached to a task. `task_id` is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub author_name: String,
    pub author_email: Option<String>,
    pub task_id: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Comment {
    /// Whether the comment has been edited since creation.
    /// `updated_at` equals `created_at` until the first edit.
    pub fn is_edited(&self) -> bool {
        self.updated_at != self.created_at
    }

    /// Content split on embedded line breaks, one paragraph per line.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content.split('\n').collect()
    }
}

/// Envelope of `GET /tasks/`.
#[derive(Debug, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

/// Envelope of `GET /comments/?task_id={id}`.
#[derive(Debug, Deserialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
    pub count: i64,
}

/// Envelope of `GET /tasks/{id}/comments`.
#[derive(Debug, Deserialize)]
pub struct TaskCommentsResponse {
    pub task: Task,
    pub comments: Vec<Comment>,
    pub comments_count: i64,
}

/// Body of `POST /tasks/`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

/// Body of `PUT /tasks/{id}`. Absent fields are left unchanged server-side.
#[derive(Debug, Clone, Serialize, Default)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
}

/// Body of `POST /comments/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub content: String,
    pub author_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    pub task_id: i64,
}

/// Body of `PUT /comments/{id}`. Absent fields are left unchanged server-side.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CommentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
}

/// Format a task status for display.
pub fn format_status(s: TaskStatus) -> &'static str {
    match s {
        TaskStatus::Pending => "pending",
        TaskStatus::InProgress => "in progress",
        TaskStatus::Completed => "completed",
    }
}

/// Format a task priority for display.
pub fn format_priority(p: TaskPriority) -> &'static str {
    match p {
        TaskPriority::Low => "low",
        TaskPriority::Medium => "medium",
        TaskPriority::High => "high",
    }
}

/// Format a server timestamp for display.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Check an author email against the local@domain.tld pattern.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn sample_comment() -> Comment {
        Comment {
            id: 1,
            content: "first line\nsecond line".into(),
            author_name: "Ada".into(),
            author_email: None,
            task_id: 7,
            created_at: ts("2024-03-01T10:00:00"),
            updated_at: ts("2024-03-01T10:00:00"),
        }
    }

    #[test]
    fn comment_is_edited_only_when_timestamps_differ() {
        let mut c = sample_comment();
        assert!(!c.is_edited());
        c.updated_at = ts("2024-03-02T09:30:00");
        assert!(c.is_edited());
    }

    #[test]
    fn comment_content_splits_into_paragraphs() {
        let c = sample_comment();
        assert_eq!(c.paragraphs(), vec!["first line", "second line"]);
    }

    #[test]
    fn task_deserializes_from_backend_json() {
        let json = r#"{
            "id": 3,
            "title": "Ship it",
            "description": null,
            "status": "in_progress",
            "priority": "high",
            "created_at": "2024-01-01T12:00:00.123456",
            "updated_at": "2024-01-02T08:00:00",
            "comments_count": 2
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.comments_count, 2);
        assert!(task.description.is_none());
    }

    #[test]
    fn tasks_envelope_unwraps() {
        let json = r#"{"tasks": []}"#;
        let body: TasksResponse = serde_json::from_str(json).unwrap();
        assert!(body.tasks.is_empty());
    }

    #[test]
    fn task_patch_omits_absent_fields() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"status": "completed"}));
    }

    #[test]
    fn new_comment_serializes_with_task_id() {
        let body = NewComment {
            content: "hi".into(),
            author_name: "Ada".into(),
            author_email: None,
            task_id: 9,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"content": "hi", "author_name": "Ada", "task_id": 9})
        );
    }

    #[test]
    fn email_pattern_accepts_local_at_domain_tld() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("foo"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("ada@example"));
    }
}
