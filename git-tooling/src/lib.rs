//! Local working-tree operations for the direct-write dispatch mode.
//!
//! Wraps the `git` CLI (the checkout the CI runner already made) rather than
//! linking a git library: the bot needs four operations — write, stage,
//! commit, push — and the runner's git carries the credential configuration.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Committer identity used for bot commits.
const COMMITTER_NAME: &str = "fixbot";
const COMMITTER_EMAIL: &str = "fixbot@users.noreply.github.com";

/// Errors from working-tree operations.
#[derive(Debug, Error)]
pub enum GitToolingError {
    /// A file write (or parent-directory creation) failed.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `git` could not be spawned.
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    /// A git command exited non-zero.
    #[error("git {args} failed: {stderr}")]
    Command { args: String, stderr: String },
}

/// A git checkout rooted at a local directory.
pub struct Worktree {
    root: PathBuf,
}

impl Worktree {
    /// Opens the checkout at `root`. No validation happens here; the first
    /// git command fails if `root` is not a repository.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The checkout root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Overwrites the file at the repository-relative `path`, creating
    /// parent directories as needed. Returns the absolute path.
    pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf, GitToolingError> {
        let absolute = self.root.join(path);
        if let Some(parent) = absolute.parent() {
            std::fs::create_dir_all(parent).map_err(|source| GitToolingError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&absolute, content).map_err(|source| GitToolingError::Write {
            path: absolute.clone(),
            source,
        })?;
        Ok(absolute)
    }

    /// Stages the given repository-relative paths.
    pub fn stage(&self, paths: &[String]) -> Result<(), GitToolingError> {
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run_git(&args)?;
        Ok(())
    }

    /// Commits staged changes. Returns `false`, without error, when nothing
    /// is staged.
    pub fn commit(&self, message: &str) -> Result<bool, GitToolingError> {
        if !self.has_staged_changes()? {
            tracing::info!("nothing staged; skipping commit");
            return Ok(false);
        }
        let name = format!("user.name={COMMITTER_NAME}");
        let email = format!("user.email={COMMITTER_EMAIL}");
        self.run_git(&[
            "-c",
            name.as_str(),
            "-c",
            email.as_str(),
            "commit",
            "-m",
            message,
        ])?;
        Ok(true)
    }

    /// Pushes the current HEAD to `branch` on `origin`. A push with nothing
    /// new to send is a no-op on the remote side.
    pub fn push(&self, branch: &str) -> Result<(), GitToolingError> {
        let refspec = format!("HEAD:{branch}");
        self.run_git(&["push", "origin", refspec.as_str()])?;
        tracing::info!(branch, "pushed to origin");
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool, GitToolingError> {
        // Exit code 1 from `diff --cached --quiet` means "differences exist".
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(["diff", "--cached", "--quiet"])
            .output()?;
        Ok(!output.status.success())
    }

    fn run_git(&self, args: &[&str]) -> Result<String, GitToolingError> {
        let output = Command::new("git")
            .current_dir(&self.root)
            .args(args)
            .output()?;
        if !output.status.success() {
            return Err(GitToolingError::Command {
                args: args.join(" "),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    fn init_repo() -> (tempfile::TempDir, Worktree) {
        let dir = tempfile::tempdir().unwrap();
        let tree = Worktree::open(dir.path());
        tree.run_git(&["init", "--initial-branch=main"]).unwrap();
        (dir, tree)
    }

    #[test]
    fn write_file_creates_parent_directories() {
        let (_dir, tree) = init_repo();
        let written = tree
            .write_file("apps/app_flutter/lib/main.dart", "void main() {}")
            .unwrap();
        assert_eq!(std::fs::read_to_string(written).unwrap(), "void main() {}");
    }

    #[test]
    fn write_file_overwrites_existing_content() {
        let (_dir, tree) = init_repo();
        tree.write_file("a.txt", "old").unwrap();
        let written = tree.write_file("a.txt", "new").unwrap();
        assert_eq!(std::fs::read_to_string(written).unwrap(), "new");
    }

    #[test]
    fn stage_and_commit_records_the_message() {
        let (_dir, tree) = init_repo();
        tree.write_file("a.txt", "content").unwrap();
        tree.stage(&["a.txt".to_string()]).unwrap();
        assert!(tree.commit("chore(codex): test commit").unwrap());

        let subject = tree.run_git(&["log", "-1", "--format=%s"]).unwrap();
        assert_eq!(subject.trim(), "chore(codex): test commit");
    }

    #[test]
    fn commit_with_nothing_staged_is_a_clean_noop() {
        let (_dir, tree) = init_repo();
        assert!(!tree.commit("empty").unwrap());
    }

    #[test]
    fn unchanged_file_stages_nothing() {
        let (_dir, tree) = init_repo();
        tree.write_file("a.txt", "same").unwrap();
        tree.stage(&["a.txt".to_string()]).unwrap();
        assert!(tree.commit("first").unwrap());

        // Writing identical content again leaves nothing to commit.
        tree.write_file("a.txt", "same").unwrap();
        tree.stage(&["a.txt".to_string()]).unwrap();
        assert!(!tree.commit("second").unwrap());
    }

    #[test]
    fn push_sends_the_commit_to_a_local_remote() {
        let remote_dir = tempfile::tempdir().unwrap();
        let remote = Worktree::open(remote_dir.path());
        remote.run_git(&["init", "--bare"]).unwrap();

        let (_dir, tree) = init_repo();
        let remote_path = remote_dir.path().to_string_lossy().into_owned();
        tree.run_git(&["remote", "add", "origin", remote_path.as_str()])
            .unwrap();
        tree.write_file("a.txt", "content").unwrap();
        tree.stage(&["a.txt".to_string()]).unwrap();
        tree.commit("pushed commit").unwrap();
        tree.push("feature/branch").unwrap();

        let subject = remote
            .run_git(&["log", "feature/branch", "-1", "--format=%s"])
            .unwrap();
        assert_eq!(subject.trim(), "pushed commit");
    }

    #[test]
    fn failed_git_command_reports_args_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let tree = Worktree::open(dir.path());
        // Not a repository: staging must fail.
        let err = tree.stage(&["a.txt".to_string()]).unwrap_err();
        match err {
            GitToolingError::Command { args, .. } => assert!(args.starts_with("add")),
            other => panic!("expected Command error, got {other:?}"),
        }
    }
}
