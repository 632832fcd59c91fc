//! The gather → request → classify → dispatch pipeline, one run per process.

use anyhow::Context as _;

use fixbot_core::{
    BotConfig, DEFAULT_ALLOWED_PREFIX, RunOutcome, SkipReason, TriggerEvent, classify,
    comment_disposition, comment_prompt, fix_prompt, gather_docs, render_summary,
    summarize_failures,
};
use fixbot_git_tooling::Worktree;
use fixbot_github::GithubClient;
use fixbot_openai::CompletionClient;

use crate::dispatch::{COMMENT_PROFILE, FIX_PROFILE, dispatch};

fn github_client(config: &BotConfig) -> GithubClient {
    GithubClient::new(
        &config.github_api_url,
        &config.github_token,
        &config.owner,
        &config.repo,
    )
}

fn completion_client(config: &BotConfig) -> CompletionClient {
    CompletionClient::new(
        &config.openai_base_url,
        &config.openai_api_key,
        &config.model,
        config.temperature,
    )
}

fn primary_prefix(config: &BotConfig) -> &str {
    config
        .allowed_prefixes
        .first()
        .map_or(DEFAULT_ALLOWED_PREFIX, String::as_str)
}

/// Handles an `issue_comment` event.
pub async fn run_comment(config: &BotConfig) -> anyhow::Result<RunOutcome> {
    let event = TriggerEvent::from_file(&config.event_path, TriggerEvent::parse_comment)
        .context("reading event payload")?;
    let TriggerEvent::Comment { body, issue_number } = event else {
        unreachable!("parse_comment yields Comment");
    };

    // Trigger checks come before any network traffic.
    if let Some(reason) = comment_disposition(&body, config) {
        return Ok(RunOutcome::Skipped(reason));
    }

    let github = github_client(config);
    let Some(pr) = github
        .pull_request(issue_number)
        .await
        .context("resolving pull request for comment")?
    else {
        tracing::info!(issue_number, "comment is not on a pull request");
        return Ok(RunOutcome::Skipped(SkipReason::NoAssociatedPullRequest));
    };

    let docs = gather_docs(&config.docs_dir).context("gathering docs")?;
    let prompt = comment_prompt(&pr.head.ref_name, &body, &docs, primary_prefix(config));
    let reply = completion_client(config)
        .complete(&prompt)
        .await
        .context("requesting completion")?;

    let decision = classify(&reply, &config.allowed_prefixes);
    let worktree = Worktree::open(std::env::current_dir().context("resolving working directory")?);
    let kind = dispatch(
        &github,
        &worktree,
        &COMMENT_PROFILE,
        pr.number,
        &pr.head.ref_name,
        &body,
        decision,
    )
    .await?;
    Ok(RunOutcome::Dispatched(kind))
}

/// Handles a failed `workflow_run` event.
pub async fn run_fix(config: &BotConfig) -> anyhow::Result<RunOutcome> {
    let event = TriggerEvent::from_file(&config.event_path, TriggerEvent::parse_workflow_failure)
        .context("reading event payload")?;
    let TriggerEvent::WorkflowFailure { run_id, head_sha } = event else {
        unreachable!("parse_workflow_failure yields WorkflowFailure");
    };

    let github = github_client(config);
    let pulls = github
        .pulls_for_commit(&head_sha)
        .await
        .context("resolving pull request for failed run")?;
    let Some(pr) = pulls.into_iter().next() else {
        tracing::info!(head_sha, "no pull request associated with failed run");
        return Ok(RunOutcome::Skipped(SkipReason::NoAssociatedPullRequest));
    };

    let jobs = github
        .jobs_for_run(run_id)
        .await
        .context("listing jobs for failed run")?;
    let failing = summarize_failures(&jobs);
    if failing.is_empty() {
        tracing::info!(run_id, "no failing jobs in run; proceeding with empty summary");
    }
    let summary = render_summary(&failing);

    let docs = gather_docs(&config.docs_dir).context("gathering docs")?;
    let prompt = fix_prompt(&summary, &docs, primary_prefix(config));
    let reply = completion_client(config)
        .complete(&prompt)
        .await
        .context("requesting completion")?;

    let decision = classify(&reply, &config.allowed_prefixes);
    let worktree = Worktree::open(std::env::current_dir().context("resolving working directory")?);
    let kind = dispatch(
        &github,
        &worktree,
        &FIX_PROFILE,
        pr.number,
        &pr.head.ref_name,
        &summary,
        decision,
    )
    .await?;
    Ok(RunOutcome::Dispatched(kind))
}
