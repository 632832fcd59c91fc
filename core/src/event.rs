//! Inbound GitHub event payloads.
//!
//! Each invocation reads exactly one payload from disk and converts it into
//! a [`TriggerEvent`]. The payload is never consulted again afterwards.

use std::path::Path;

use serde::Deserialize;

use crate::error::CoreError;

/// The event that triggered this invocation.
///
/// Built once from the inbound payload and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// A workflow run completed with a failure.
    WorkflowFailure { run_id: u64, head_sha: String },
    /// Someone commented on an issue or pull request.
    Comment { body: String, issue_number: u64 },
}

#[derive(Deserialize)]
struct EventPayload {
    #[serde(default)]
    workflow_run: Option<WorkflowRunPayload>,
    #[serde(default)]
    comment: Option<CommentPayload>,
    #[serde(default)]
    issue: Option<IssuePayload>,
}

#[derive(Deserialize)]
struct WorkflowRunPayload {
    id: u64,
    head_sha: String,
}

#[derive(Deserialize)]
struct CommentPayload {
    body: String,
}

#[derive(Deserialize)]
struct IssuePayload {
    number: u64,
}

impl TriggerEvent {
    /// Parses a `workflow_run` (completed, failed) event payload.
    pub fn parse_workflow_failure(raw: &str) -> Result<Self, CoreError> {
        let payload: EventPayload = serde_json::from_str(raw)
            .map_err(|e| CoreError::MalformedEvent(e.to_string()))?;
        let run = payload
            .workflow_run
            .ok_or_else(|| CoreError::MalformedEvent("missing workflow_run".to_string()))?;
        Ok(Self::WorkflowFailure {
            run_id: run.id,
            head_sha: run.head_sha,
        })
    }

    /// Parses an `issue_comment` event payload.
    pub fn parse_comment(raw: &str) -> Result<Self, CoreError> {
        let payload: EventPayload = serde_json::from_str(raw)
            .map_err(|e| CoreError::MalformedEvent(e.to_string()))?;
        let comment = payload
            .comment
            .ok_or_else(|| CoreError::MalformedEvent("missing comment".to_string()))?;
        let issue = payload
            .issue
            .ok_or_else(|| CoreError::MalformedEvent("missing issue".to_string()))?;
        Ok(Self::Comment {
            body: comment.body,
            issue_number: issue.number,
        })
    }

    /// Reads the payload file at `path` and parses it with `parse`.
    pub fn from_file(
        path: &Path,
        parse: fn(&str) -> Result<Self, CoreError>,
    ) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(&raw)
    }
}
