//! Response classification: the single place that decides what a completion
//! reply turns into.
//!
//! The rules are ordered and total; every reply maps to exactly one
//! [`RoutingDecision`], with [`RoutingDecision::Plan`] as the fallback.
//! Precedence is fixed here and nowhere else: diff detection wins over
//! fenced-block detection, and a fenced reply whose blocks all fail the
//! path filter falls through to a plan instead of an empty direct write.

/// One file to write in the local working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    /// Repository-relative path (validated against the allowed prefixes).
    pub path: String,
    /// Full replacement content for the file.
    pub content: String,
}

/// What to do with a completion reply. Exactly one variant per reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Post the text as an analysis/plan comment.
    Plan(String),
    /// Store the text as a unified-diff artifact and announce it.
    PatchArtifact(String),
    /// Write the files, commit, and push to the PR branch.
    DirectWrite(Vec<FileEdit>),
}

const DIFF_OLD_MARKER: &str = "--- ";
const DIFF_NEW_MARKER: &str = "+++ ";
const FENCE: &str = "```";

/// Classifies a completion reply.
///
/// Ordered rules, first match wins:
/// 1. a line starting with `--- ` and a line starting with `+++ ` →
///    [`RoutingDecision::PatchArtifact`];
/// 2. one or more fenced code blocks whose first line is a path under an
///    allowed prefix → [`RoutingDecision::DirectWrite`] (non-matching blocks
///    are discarded; all-discarded falls through);
/// 3. anything else → [`RoutingDecision::Plan`].
pub fn classify(reply: &str, allowed_prefixes: &[String]) -> RoutingDecision {
    if looks_like_diff(reply) {
        return RoutingDecision::PatchArtifact(reply.to_string());
    }

    let edits = fenced_file_edits(reply, allowed_prefixes);
    if !edits.is_empty() {
        return RoutingDecision::DirectWrite(edits);
    }

    RoutingDecision::Plan(reply.to_string())
}

fn looks_like_diff(reply: &str) -> bool {
    let mut has_old = false;
    let mut has_new = false;
    for line in reply.lines() {
        has_old |= line.starts_with(DIFF_OLD_MARKER);
        has_new |= line.starts_with(DIFF_NEW_MARKER);
        if has_old && has_new {
            return true;
        }
    }
    false
}

/// Extracts file edits from fenced code blocks.
///
/// A block opens at a line starting with three backticks (any info string is
/// ignored) and closes at the next such line. The first line inside the
/// block, trimmed, is the candidate path; the remaining lines, joined with
/// `\n`, are the content. Unterminated blocks are ignored.
fn fenced_file_edits(reply: &str, allowed_prefixes: &[String]) -> Vec<FileEdit> {
    let mut edits = Vec::new();
    let mut block: Option<Vec<&str>> = None;

    for line in reply.lines() {
        if line.trim_start().starts_with(FENCE) {
            match block.take() {
                // Closing fence: the collected lines form one block.
                Some(lines) => {
                    if let Some(edit) = edit_from_block(&lines, allowed_prefixes) {
                        edits.push(edit);
                    }
                }
                // Opening fence: start collecting.
                None => block = Some(Vec::new()),
            }
            continue;
        }
        if let Some(lines) = block.as_mut() {
            lines.push(line);
        }
    }

    edits
}

fn edit_from_block(lines: &[&str], allowed_prefixes: &[String]) -> Option<FileEdit> {
    let (first, rest) = lines.split_first()?;
    let path = first.trim();
    if !path_is_allowed(path, allowed_prefixes) {
        return None;
    }
    Some(FileEdit {
        path: path.to_string(),
        content: rest.join("\n"),
    })
}

/// A candidate path must sit under an allowed prefix and must not be able to
/// escape the working tree.
fn path_is_allowed(path: &str, allowed_prefixes: &[String]) -> bool {
    if path.is_empty() || path.starts_with('/') {
        return false;
    }
    if path.split('/').any(|component| component == "..") {
        return false;
    }
    allowed_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}
