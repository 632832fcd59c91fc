//! Core types and pure logic for the fixbot response router.
//!
//! Everything in this crate is network-free: parsing the inbound GitHub
//! event payload into a [`TriggerEvent`], loading [`BotConfig`] from the
//! environment, gathering documentation snippets, building the completion
//! prompt, and classifying the completion reply into a [`RoutingDecision`].
//!
//! The HTTP clients (`fixbot-github`, `fixbot-openai`) and the dispatcher
//! (`fixbot-cli`) consume these types; none of them re-implement any of the
//! decision logic here.

mod classify;
mod config;
mod docs;
mod error;
mod event;
mod outcome;
mod prompt;
mod text;
mod workflow;

pub use classify::{FileEdit, RoutingDecision, classify};
pub use config::{
    BotConfig, DEFAULT_ALLOWED_PREFIX, DEFAULT_MODEL, DEFAULT_TEMPERATURE, MAX_ANALYSIS_CHARS,
    MAX_COMMIT_EXCERPT_CHARS, MAX_DIFF_PREVIEW_CHARS, MAX_DOC_SNIPPETS,
};
pub use docs::{DocSnippet, gather_docs};
pub use error::CoreError;
pub use event::TriggerEvent;
pub use outcome::{DispatchKind, RunOutcome, SkipReason, comment_disposition};
pub use prompt::{CompletionPrompt, comment_prompt, fix_prompt, render_docs};
pub use text::truncate_chars;
pub use workflow::{FailingJob, FailingStep, JobStep, WorkflowJob, render_summary, summarize_failures};
