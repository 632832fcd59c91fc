//! Run outcomes: what a finished invocation reports.

use std::fmt;

use crate::config::BotConfig;

/// Why a run ended without side effects. All skips exit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The comment body does not mention the bot.
    MissingTrigger,
    /// The comment is an approve directive; a separate workflow owns approval.
    ApproveDirective,
    /// No pull request is associated with the trigger.
    NoAssociatedPullRequest,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::MissingTrigger => "comment does not mention the bot",
            Self::ApproveDirective => "approve directive is handled by another workflow",
            Self::NoAssociatedPullRequest => "no associated pull request",
        };
        f.write_str(s)
    }
}

/// Which external action a dispatch performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    Plan,
    PatchArtifact,
    DirectWrite,
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Plan => "plan comment",
            Self::PatchArtifact => "patch artifact",
            Self::DirectWrite => "direct write",
        };
        f.write_str(s)
    }
}

/// Result of one invocation. Both variants exit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Dispatched(DispatchKind),
    Skipped(SkipReason),
}

/// Decides, before any network traffic, whether a comment activates the bot.
///
/// The approve check runs first: an approve directive necessarily contains
/// the trigger token, and it must short-circuit to a no-op.
pub fn comment_disposition(body: &str, config: &BotConfig) -> Option<SkipReason> {
    if body.contains(&config.approve_token) {
        return Some(SkipReason::ApproveDirective);
    }
    if !body.contains(&config.trigger_token) {
        return Some(SkipReason::MissingTrigger);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;

    #[test]
    fn plain_comment_is_skipped() {
        let config = test_config();
        assert_eq!(
            comment_disposition("please fix the build", &config),
            Some(SkipReason::MissingTrigger)
        );
    }

    #[test]
    fn approve_directive_is_skipped() {
        let config = test_config();
        assert_eq!(
            comment_disposition("@codex approve this", &config),
            Some(SkipReason::ApproveDirective)
        );
    }

    #[test]
    fn trigger_mention_activates_the_bot() {
        let config = test_config();
        assert_eq!(comment_disposition("@codex fix the lints", &config), None);
    }

    #[test]
    fn trigger_anywhere_in_the_body_counts() {
        let config = test_config();
        assert_eq!(
            comment_disposition("could you take a look, @codex?", &config),
            None
        );
    }
}
