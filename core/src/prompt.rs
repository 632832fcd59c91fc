//! Prompt construction.
//!
//! The templates are fixed; only the instruction (or failing summary), the
//! gathered docs and the allowed path prefix are interpolated. Comment mode
//! carries a system message; fix mode sends a single user message.

use crate::docs::DocSnippet;

/// The system/user message pair sent to the completion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionPrompt {
    pub system: Option<String>,
    pub user: String,
}

const COMMENT_SYSTEM: &str =
    "You are Codex, an expert Flutter engineer. Return clear, minimal diffs or a step-by-step plan.";

/// Renders the docs section of a prompt: `# name` headers joined by rules,
/// or a fixed marker when no docs exist.
pub fn render_docs(docs: &[DocSnippet]) -> String {
    if docs.is_empty() {
        return "No docs folder.".to_string();
    }
    docs.iter()
        .map(|d| format!("# {}\n{}", d.name, d.body))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// Builds the prompt for a comment-triggered run.
pub fn comment_prompt(
    branch: &str,
    instruction: &str,
    docs: &[DocSnippet],
    allowed_prefix: &str,
) -> CompletionPrompt {
    let user = format!(
        "\nPR branch: {branch}\nUser instruction: {instruction}\n\n\
         Project docs:\n{docs}\n\n\
         Produce either a minimal unified diff modifying files under {allowed_prefix}** to satisfy the instruction,\n\
         or respond with PLAN: followed by precise steps.\n",
        docs = render_docs(docs),
    );
    CompletionPrompt {
        system: Some(COMMENT_SYSTEM.to_string()),
        user,
    }
}

/// Builds the prompt for a failed-workflow-run.
///
/// `failing_summary` is the pretty-JSON rendering from
/// [`crate::workflow::render_summary`].
pub fn fix_prompt(
    failing_summary: &str,
    docs: &[DocSnippet],
    allowed_prefix: &str,
) -> CompletionPrompt {
    let user = format!(
        "\nYou are Codex, an autonomous engineer for a Flutter (web+mobile) app.\n\
         A CI workflow failed. Based on the failing jobs/steps and the project docs,\n\
         produce either:\n\
         1) A minimal patch (unified diff) to fix the failure; or\n\
         2) A clear step-by-step plan if code cannot be safely changed.\n\n\
         Rules:\n\
         - Prefer changes under {allowed_prefix}** .\n\
         - If the issue is formatting/lints, include direct fixes.\n\
         - If you propose a patch, output ONLY a unified diff that applies cleanly with 'git apply -p0'.\n\
         - If unsure, output a plan prefixed with PLAN:\n\n\
         Failing summary:\n{failing_summary}\n\n\
         Relevant docs:\n{docs}\n",
        docs = render_docs(docs),
    );
    CompletionPrompt { system: None, user }
}
