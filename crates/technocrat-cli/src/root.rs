use std::path::{Path, PathBuf};
use technocrat_core::workspace;

/// The directory commands act from: `--root` / `TECHNOCRAT_ROOT` when given,
/// otherwise the current directory.
pub fn resolve_start(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Workspace root above `start` (first ancestor holding `memory/` or
/// `.git/`), or `start` itself when there is none.
pub fn workspace_root(start: &Path) -> PathBuf {
    workspace::find_root(start).unwrap_or_else(|| start.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_start_wins() {
        let dir = TempDir::new().unwrap();
        assert_eq!(resolve_start(Some(dir.path())), dir.path());
    }

    #[test]
    fn root_found_from_feature_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("memory")).unwrap();
        let deep = dir.path().join("specs/001-login/notes");
        std::fs::create_dir_all(&deep).unwrap();
        assert_eq!(workspace_root(&deep), dir.path());
    }

    #[test]
    fn unmarked_start_is_its_own_root() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("plain");
        std::fs::create_dir_all(&plain).unwrap();
        // The temp dir itself may sit inside a repository, so only assert
        // that the result is an ancestor of `plain`.
        assert!(plain.starts_with(workspace_root(&plain)));
    }
}
