//! Environment-driven configuration.
//!
//! Every invocation is a fresh process; configuration is read once from the
//! environment and carried as plain data through the pipeline.

use std::path::PathBuf;

use crate::error::CoreError;

/// Documentation snippets included in a prompt, at most.
pub const MAX_DOC_SNIPPETS: usize = 12;

/// Upper bound for an inline diff preview inside a comment body.
pub const MAX_DIFF_PREVIEW_CHARS: usize = 6_000;

/// Upper bound for a plan / analysis comment body.
pub const MAX_ANALYSIS_CHARS: usize = 65_000;

/// Upper bound for the instruction excerpt embedded in a commit message.
pub const MAX_COMMIT_EXCERPT_CHARS: usize = 120;

/// Default completion model.
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Default sampling temperature (deterministic-leaning).
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Default path prefix under which direct writes are allowed.
pub const DEFAULT_ALLOWED_PREFIX: &str = "apps/app_flutter/";

const DEFAULT_TRIGGER: &str = "@codex";
const DEFAULT_DOCS_DIR: &str = "docs";
const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Process-wide configuration, loaded once from the environment.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Token for the GitHub REST API.
    pub github_token: String,
    /// API key for the completion service.
    pub openai_api_key: String,
    /// Repository owner (left of the `/` in `GITHUB_REPOSITORY`).
    pub owner: String,
    /// Repository name (right of the `/`).
    pub repo: String,
    /// Path of the inbound event payload (`GITHUB_EVENT_PATH`).
    pub event_path: PathBuf,
    /// Mention that activates the bot in a comment body.
    pub trigger_token: String,
    /// Directive that short-circuits to a no-op (approval is handled by a
    /// separate workflow).
    pub approve_token: String,
    /// Completion model name.
    pub model: String,
    /// Sampling temperature for the completion request.
    pub temperature: f32,
    /// Directory scanned for markdown documentation snippets.
    pub docs_dir: PathBuf,
    /// Path prefixes under which replies may direct-write files.
    pub allowed_prefixes: Vec<String>,
    /// Base URL for the GitHub REST API.
    pub github_api_url: String,
    /// Base URL for the completion service.
    pub openai_base_url: String,
}

fn required(name: &'static str) -> Result<String, CoreError> {
    match std::env::var(name) {
        Ok(v) if !v.is_empty() => Ok(v),
        _ => Err(CoreError::MissingEnv(name)),
    }
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl BotConfig {
    /// Loads configuration from the environment.
    ///
    /// `GITHUB_TOKEN`, `OPENAI_API_KEY`, `GITHUB_REPOSITORY` and
    /// `GITHUB_EVENT_PATH` are required; everything else has a default.
    pub fn from_env() -> Result<Self, CoreError> {
        let github_token = required("GITHUB_TOKEN")?;
        let openai_api_key = required("OPENAI_API_KEY")?;
        let repository = required("GITHUB_REPOSITORY")?;
        let event_path = PathBuf::from(required("GITHUB_EVENT_PATH")?);

        let (owner, repo) = repository
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| CoreError::InvalidRepository(repository.clone()))?;

        let trigger_token = optional("FIXBOT_TRIGGER", DEFAULT_TRIGGER);
        let approve_token = format!("{trigger_token} approve");

        let allowed_prefixes = optional("FIXBOT_ALLOWED_PREFIXES", DEFAULT_ALLOWED_PREFIX)
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            github_token,
            openai_api_key,
            owner: owner.to_string(),
            repo: repo.to_string(),
            event_path,
            trigger_token,
            approve_token,
            model: optional("FIXBOT_MODEL", DEFAULT_MODEL),
            temperature: DEFAULT_TEMPERATURE,
            docs_dir: PathBuf::from(optional("FIXBOT_DOCS_DIR", DEFAULT_DOCS_DIR)),
            allowed_prefixes,
            github_api_url: optional("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            openai_base_url: optional("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
        })
    }
}
