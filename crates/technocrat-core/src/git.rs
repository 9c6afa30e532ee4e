use crate::error::{Result, TechnocratError};
use crate::{io, paths};
use std::path::Path;
use std::process::Command;

/// Branch checked out in the repository at `root`, read from `.git/HEAD`.
///
/// `None` for detached heads, worktree `.git` files and unreadable HEADs.
pub fn current_branch(root: &Path) -> Option<String> {
    let head = io::read_optional(&paths::git_head_path(root))?;
    let branch = head.trim().strip_prefix("ref: refs/heads/")?.trim();
    if branch.is_empty() {
        None
    } else {
        Some(branch.to_string())
    }
}

/// True when `root` holds a `.git` entry and a `git` binary is on PATH.
pub fn is_available(root: &Path) -> bool {
    root.join(paths::GIT_DIR).exists() && which::which("git").is_ok()
}

/// Create and switch to `branch` with `git checkout -b`.
pub fn create_branch(root: &Path, branch: &str) -> Result<()> {
    let output = Command::new("git")
        .args(["checkout", "-b", branch])
        .current_dir(root)
        .output()?;
    if output.status.success() {
        tracing::info!(branch, "created git branch");
        Ok(())
    } else {
        Err(TechnocratError::Git(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ))
    }
}
