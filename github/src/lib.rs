//! GitHub REST v3 client for the fixbot dispatcher.
//!
//! Thin, typed wrappers over the handful of endpoints the bot touches:
//! pull-request lookup, jobs-for-run listing, issue comments, and the
//! contents API used to store patch artifacts on a branch. No retries; a
//! failed call propagates and ends the run.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use fixbot_core::WorkflowJob;

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";
const ACCEPT_JSON: &str = "application/vnd.github+json";
const USER_AGENT_VALUE: &str = concat!("fixbot/", env!("CARGO_PKG_VERSION"));

/// Errors from GitHub API calls.
#[derive(Debug, Error)]
pub enum GithubError {
    /// Network/transport failure or response-decoding failure.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("GitHub API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The bearer token contains bytes that cannot go into a header.
    #[error("invalid GitHub token")]
    InvalidToken,
}

/// A pull request, reduced to the fields the bot needs.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub head: HeadRef,
}

/// The head of a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadRef {
    /// Branch name (`ref` on the wire).
    #[serde(rename = "ref")]
    pub ref_name: String,
}

#[derive(Deserialize)]
struct JobsResponse {
    jobs: Vec<WorkflowJob>,
}

#[derive(Deserialize)]
struct ContentsInfo {
    sha: String,
}

/// Client for one repository, authenticated with a bearer token.
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    owner: String,
    repo: String,
}

impl GithubClient {
    /// Creates a client for `owner/repo` against `base_url`
    /// (`https://api.github.com` outside of tests).
    pub fn new(base_url: &str, token: &str, owner: &str, repo: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        }
    }

    fn headers(&self) -> Result<HeaderMap, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        let auth = format!("Bearer {}", self.token);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|_| GithubError::InvalidToken)?,
        );
        Ok(headers)
    }

    fn repo_url(&self, rest: &str) -> String {
        format!("{}/repos/{}/{}/{rest}", self.base_url, self.owner, self.repo)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, GithubError> {
        let mut request = self.client.request(method, url).headers(self.headers()?);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Fetches a pull request by number. `Ok(None)` when the number does not
    /// resolve to a pull request (e.g. a comment on a plain issue).
    pub async fn pull_request(&self, number: u64) -> Result<Option<PullRequest>, GithubError> {
        let url = self.repo_url(&format!("pulls/{number}"));
        match self.send(Method::GET, &url, None).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(GithubError::Status { status, .. }) if status == StatusCode::NOT_FOUND => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lists the pull requests associated with a commit. Empty when the
    /// commit reached the branch without a PR.
    pub async fn pulls_for_commit(&self, sha: &str) -> Result<Vec<PullRequest>, GithubError> {
        let url = self.repo_url(&format!("commits/{sha}/pulls"));
        Ok(self.send(Method::GET, &url, None).await?.json().await?)
    }

    /// Lists the job executions of a workflow run.
    pub async fn jobs_for_run(&self, run_id: u64) -> Result<Vec<WorkflowJob>, GithubError> {
        let url = self.repo_url(&format!("actions/runs/{run_id}/jobs?per_page=100"));
        let jobs: JobsResponse = self.send(Method::GET, &url, None).await?.json().await?;
        Ok(jobs.jobs)
    }

    /// Posts one comment on an issue or pull request.
    pub async fn create_comment(&self, issue_number: u64, body: &str) -> Result<(), GithubError> {
        let url = self.repo_url(&format!("issues/{issue_number}/comments"));
        self.send(Method::POST, &url, Some(json!({ "body": body })))
            .await?;
        tracing::info!(issue_number, "posted comment");
        Ok(())
    }

    /// Creates or overwrites `path` on `branch` with `content` in a single
    /// commit via the contents API.
    ///
    /// Updating an existing file requires its current blob sha, so the
    /// existing entry is looked up first; a 404 there means this is a create.
    pub async fn put_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        branch: &str,
    ) -> Result<(), GithubError> {
        let url = self.repo_url(&format!("contents/{path}"));

        let existing_sha = match self
            .send(Method::GET, &format!("{url}?ref={branch}"), None)
            .await
        {
            Ok(response) => {
                let info: ContentsInfo = response.json().await?;
                Some(info.sha)
            }
            Err(GithubError::Status { status, .. }) if status == StatusCode::NOT_FOUND => None,
            Err(e) => return Err(e),
        };

        let mut body = json!({
            "message": message,
            "content": BASE64.encode(content.as_bytes()),
            "branch": branch,
        });
        if let Some(sha) = existing_sha {
            body["sha"] = json!(sha);
        }

        self.send(Method::PUT, &url, Some(body)).await?;
        tracing::info!(path, branch, "committed file via contents API");
        Ok(())
    }
}
