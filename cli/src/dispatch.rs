//! Dispatcher: turns a [`RoutingDecision`] into exactly one external action.

use anyhow::Context as _;

use fixbot_core::{
    DispatchKind, MAX_ANALYSIS_CHARS, MAX_COMMIT_EXCERPT_CHARS, MAX_DIFF_PREVIEW_CHARS,
    RoutingDecision, truncate_chars,
};
use fixbot_git_tooling::Worktree;
use fixbot_github::GithubClient;

/// Mode-specific dispatch texts. The two trigger modes store their artifacts
/// at different well-known paths and word their comments differently.
pub struct DispatchProfile {
    /// Branch path of the stored diff artifact.
    pub artifact_path: &'static str,
    /// Commit message used when storing the artifact.
    pub artifact_commit_message: &'static str,
    /// First line of the artifact announcement comment.
    pub artifact_comment_intro: &'static str,
    /// Prefix of a plan/analysis comment.
    pub plan_prefix: &'static str,
}

/// Profile for comment-triggered runs.
pub const COMMENT_PROFILE: DispatchProfile = DispatchProfile {
    artifact_path: ".codex/last_request.diff",
    artifact_commit_message: "chore(codex): proposed patch from comment",
    artifact_comment_intro:
        "🧩 Codex produced a patch and saved it to `.codex/last_request.diff`. Review or apply it.",
    plan_prefix: "🧭 Codex plan:\n\n",
};

/// Profile for failed-workflow-run runs.
pub const FIX_PROFILE: DispatchProfile = DispatchProfile {
    artifact_path: ".codex/last_patch.diff",
    artifact_commit_message: "chore(codex): store last auto patch",
    artifact_comment_intro:
        "🛠️ Codex generated a patch and saved it to `.codex/last_patch.diff`. Please apply & review:",
    plan_prefix: "🧠 Codex analysis of CI failure:\n\n",
};

/// Builds the body of a plan comment, bounded for the platform limit.
pub fn plan_comment_body(profile: &DispatchProfile, text: &str) -> String {
    format!("{}{}", profile.plan_prefix, truncate_chars(text, MAX_ANALYSIS_CHARS))
}

/// Builds the body of an artifact announcement comment with a bounded
/// inline diff preview.
pub fn patch_comment_body(profile: &DispatchProfile, diff: &str) -> String {
    format!(
        "{}\n\n```diff\n{}\n```",
        profile.artifact_comment_intro,
        truncate_chars(diff, MAX_DIFF_PREVIEW_CHARS)
    )
}

/// Builds the confirmation comment for a direct write.
pub fn direct_write_comment_body(file_count: usize, branch: &str) -> String {
    format!("🛠️ Codex wrote {file_count} file(s) and pushed them to `{branch}`.")
}

/// Builds a one-line commit message carrying a bounded excerpt of the
/// originating instruction.
pub fn direct_write_commit_message(instruction: &str) -> String {
    let flattened = instruction.split_whitespace().collect::<Vec<_>>().join(" ");
    format!(
        "chore(codex): {}",
        truncate_chars(&flattened, MAX_COMMIT_EXCERPT_CHARS)
    )
}

/// Performs the single external-facing action for `decision`.
///
/// Failures are not retried; they propagate and end the run with a non-zero
/// exit status. A direct write that fails partway leaves already-written
/// files in place (no rollback).
pub async fn dispatch(
    github: &GithubClient,
    worktree: &Worktree,
    profile: &DispatchProfile,
    pr_number: u64,
    branch: &str,
    instruction: &str,
    decision: RoutingDecision,
) -> anyhow::Result<DispatchKind> {
    match decision {
        RoutingDecision::Plan(text) => {
            github
                .create_comment(pr_number, &plan_comment_body(profile, &text))
                .await
                .context("posting plan comment")?;
            Ok(DispatchKind::Plan)
        }
        RoutingDecision::PatchArtifact(diff) => {
            github
                .put_file(
                    profile.artifact_path,
                    profile.artifact_commit_message,
                    &diff,
                    branch,
                )
                .await
                .context("storing patch artifact")?;
            github
                .create_comment(pr_number, &patch_comment_body(profile, &diff))
                .await
                .context("announcing patch artifact")?;
            Ok(DispatchKind::PatchArtifact)
        }
        RoutingDecision::DirectWrite(edits) => {
            let mut paths = Vec::with_capacity(edits.len());
            for edit in &edits {
                worktree
                    .write_file(&edit.path, &edit.content)
                    .with_context(|| format!("writing {}", edit.path))?;
                paths.push(edit.path.clone());
            }
            worktree.stage(&paths).context("staging direct writes")?;
            let committed = worktree
                .commit(&direct_write_commit_message(instruction))
                .context("committing direct writes")?;
            if !committed {
                tracing::info!("direct write produced no changes");
            }
            worktree.push(branch).context("pushing direct writes")?;
            github
                .create_comment(pr_number, &direct_write_comment_body(paths.len(), branch))
                .await
                .context("confirming direct write")?;
            Ok(DispatchKind::DirectWrite)
        }
    }
}
