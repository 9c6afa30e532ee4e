//! Workspace identity derived from the filesystem.
//!
//! Detection never fails: unreadable directories, missing markers and
//! malformed constitution files all degrade to empty or default fields.

use crate::{git, io, paths};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Read-only snapshot of where we are: workspace root, project display
/// name, current feature and git branch. Recomputed on every invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkspaceContext {
    /// `None` when no `memory/` or `.git/` marker was found above the cwd.
    pub root: Option<PathBuf>,
    pub project_name: String,
    pub feature_name: String,
    pub branch: String,
}

impl WorkspaceContext {
    /// `root`, or `fallback` when no marker was found.
    pub fn root_or<'a>(&'a self, fallback: &'a Path) -> &'a Path {
        self.root.as_deref().unwrap_or(fallback)
    }
}

/// Detect the context of the process's current working directory.
pub fn detect_workspace_context() -> WorkspaceContext {
    match std::env::current_dir() {
        Ok(cwd) => detect_from(&cwd),
        Err(e) => {
            tracing::debug!(error = %e, "current directory unavailable");
            WorkspaceContext::default()
        }
    }
}

/// Detect the context as if `cwd` were the working directory.
pub fn detect_from(cwd: &Path) -> WorkspaceContext {
    let root = find_root(cwd);
    let base = root.as_deref().unwrap_or(cwd);

    let mut project_name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if let Some(name) = io::read_optional(&paths::constitution_path(base))
        .as_deref()
        .and_then(project_name_from_constitution)
    {
        project_name = name;
    }

    let (feature_name, branch) = match root.as_deref() {
        Some(r) => (
            extract_feature_name(cwd, r),
            git::current_branch(r).unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };

    WorkspaceContext {
        root,
        project_name,
        feature_name,
        branch,
    }
}

/// Walk upward from `start` to the first directory holding `memory/` or `.git/`.
pub fn find_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(paths::MEMORY_DIR).is_dir() || dir.join(paths::GIT_DIR).is_dir())
        .map(Path::to_path_buf)
}

/// The first path segment below `root/specs/`, or empty when `cwd` is
/// `root/specs` itself or lies outside it.
pub fn extract_feature_name(cwd: &Path, root: &Path) -> String {
    let Ok(rel) = cwd.strip_prefix(paths::specs_dir(root)) else {
        return String::new();
    };
    match rel.components().next() {
        Some(Component::Normal(name)) => name.to_string_lossy().into_owned(),
        _ => String::new(),
    }
}

/// Project name from a constitution document.
///
/// A "Project Name" heading wins: the next non-empty, non-heading line is the
/// name. Otherwise the first top-level heading is used unless it is a
/// generic one (mentions "constitution", "about" or "overview").
pub fn project_name_from_constitution(content: &str) -> Option<String> {
    let mut lines = content.lines().map(str::trim);
    while let Some(line) = lines.next() {
        if heading_text(line).is_some_and(|h| h.eq_ignore_ascii_case("project name")) {
            return lines
                .by_ref()
                .find(|l| !l.is_empty())
                .filter(|l| heading_text(l).is_none())
                .map(str::to_string);
        }
    }

    let title = content
        .lines()
        .map(str::trim)
        .find_map(|l| l.strip_prefix("# "))
        .map(str::trim)?;
    let lower = title.to_lowercase();
    let generic = ["constitution", "about", "overview"]
        .iter()
        .any(|w| lower.contains(w));
    if generic || title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    if rest.len() == line.len() || !(rest.is_empty() || rest.starts_with(' ')) {
        return None;
    }
    Some(rest.trim())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
