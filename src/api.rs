//! HTTP client for the task/comment REST backend.
//!
//! One method per REST action. Failures are classified by which layer
//! produced them: the backend answered with an error payload, no response
//! arrived at all, or the request/response could not be handled locally.
//! `ApiError::user_message` is the single place that turns any of these
//! into a human-readable string.

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{
    Comment, CommentPatch, CommentsResponse, NewComment, NewTask, Task, TaskCommentsResponse,
    TaskPatch, TasksResponse,
};

/// Fixed message shown when no response arrived.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
/// Fallback when an error response carries no message.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";
/// Fallback for client-side failures without a description.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Failure of a backend call, classified by the layer that produced it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend responded with a non-success status.
    #[error("server returned HTTP {status}")]
    Server { status: u16, message: Option<String> },
    /// No response arrived: connection refused, DNS failure, timeout.
    #[error("could not reach the backend: {0}")]
    Network(String),
    /// The request could not be built or the response not decoded.
    #[error("{0}")]
    Unexpected(String),
}

impl ApiError {
    /// Normalize any failure into one human-readable string for display.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string()),
            ApiError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ApiError::Unexpected(msg) if !msg.is_empty() => msg.clone(),
            ApiError::Unexpected(_) => UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() || err.is_decode() {
            ApiError::Unexpected(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Error payload the backend attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Client for the task/comment REST backend.
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        ApiClient {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reject non-success responses, extracting `{"error": ...}` when present.
    fn check(resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.json::<ErrorBody>().ok().and_then(|b| b.error);
        tracing::warn!(status = status.as_u16(), ?message, "backend returned an error");
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        Self::check(resp)?
            .json()
            .map_err(|e| ApiError::Unexpected(format!("invalid response body: {e}")))
    }

    /// `GET /tasks/`
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        tracing::debug!("GET /tasks/");
        let resp = self.http.get(self.url("/tasks/")).send()?;
        let body: TasksResponse = Self::parse(resp)?;
        Ok(body.tasks)
    }

    /// `GET /tasks/{id}`
    pub fn get_task(&self, id: i64) -> Result<Task> {
        tracing::debug!(id, "GET /tasks/{{id}}");
        let resp = self.http.get(self.url(&format!("/tasks/{id}"))).send()?;
        Self::parse(resp)
    }

    /// `POST /tasks/`
    pub fn create_task(&self, task: &NewTask) -> Result<Task> {
        tracing::debug!(title = %task.title, "POST /tasks/");
        let resp = self.http.post(self.url("/tasks/")).json(task).send()?;
        Self::parse(resp)
    }

    /// `PUT /tasks/{id}` — partial update, absent fields unchanged.
    pub fn update_task(&self, id: i64, patch: &TaskPatch) -> Result<Task> {
        tracing::debug!(id, "PUT /tasks/{{id}}");
        let resp = self
            .http
            .put(self.url(&format!("/tasks/{id}")))
            .json(patch)
            .send()?;
        Self::parse(resp)
    }

    /// `DELETE /tasks/{id}` — cascade-deletes the task's comments server-side.
    pub fn delete_task(&self, id: i64) -> Result<()> {
        tracing::debug!(id, "DELETE /tasks/{{id}}");
        let resp = self.http.delete(self.url(&format!("/tasks/{id}"))).send()?;
        Self::check(resp)?;
        Ok(())
    }

    /// `GET /tasks/{id}/comments`
    pub fn task_comments(&self, task_id: i64) -> Result<TaskCommentsResponse> {
        tracing::debug!(task_id, "GET /tasks/{{id}}/comments");
        let resp = self
            .http
            .get(self.url(&format!("/tasks/{task_id}/comments")))
            .send()?;
        Self::parse(resp)
    }

    /// `GET /comments/?task_id={id}`
    pub fn comments_by_task(&self, task_id: i64) -> Result<CommentsResponse> {
        tracing::debug!(task_id, "GET /comments/?task_id");
        let resp = self
            .http
            .get(self.url("/comments/"))
            .query(&[("task_id", task_id)])
            .send()?;
        Self::parse(resp)
    }

    /// `GET /comments/{id}`
    pub fn get_comment(&self, id: i64) -> Result<Comment> {
        tracing::debug!(id, "GET /comments/{{id}}");
        let resp = self.http.get(self.url(&format!("/comments/{id}"))).send()?;
        Self::parse(resp)
    }

    /// `POST /comments/`
    pub fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        tracing::debug!(task_id = comment.task_id, "POST /comments/");
        let resp = self.http.post(self.url("/comments/")).json(comment).send()?;
        Self::parse(resp)
    }

    /// `PUT /comments/{id}` — partial update, absent fields unchanged.
    pub fn update_comment(&self, id: i64, patch: &CommentPatch) -> Result<Comment> {
        tracing::debug!(id, "PUT /comments/{{id}}");
        let resp = self
            .http
            .put(self.url(&format!("/comments/{id}")))
            .json(patch)
            .send()?;
        Self::parse(resp)
    }

    /// `DELETE /comments/{id}`
    pub fn delete_comment(&self, id: i64) -> Result<()> {
        tracing::debug!(id, "DELETE /comments/{{id}}");
        let resp = self
            .http
            .delete(self.url(&format!("/comments/{id}")))
            .send()?;
        Self::check(resp)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_surfaces_its_message() {
        let err = ApiError::Server {
            status: 500,
            message: Some("boom".into()),
        };
        assert_eq!(err.user_message(), "boom");
    }

    #[test]
    fn server_error_without_message_falls_back() {
        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn network_error_uses_fixed_message() {
        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.user_message(), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn unexpected_error_uses_own_description() {
        assert_eq!(
            ApiError::Unexpected("bad payload".into()).user_message(),
            "bad payload"
        );
        assert_eq!(
            ApiError::Unexpected(String::new()).user_message(),
            UNEXPECTED_ERROR_MESSAGE
        );
    }

    #[test]
    fn urls_join_without_double_slash() {
        let client = ApiClient::new("http://localhost:5000/api");
        assert_eq!(client.url("/tasks/"), "http://localhost:5000/api/tasks/");
        assert_eq!(client.url("/comments/3"), "http://localhost:5000/api/comments/3");
    }
}
