use crate::error::{Result, TechnocratError};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const MEMORY_DIR: &str = "memory";
pub const GIT_DIR: &str = ".git";
pub const SPECS_DIR: &str = "specs";
pub const TEMPLATES_DIR: &str = "templates";
pub const TECHNOCRAT_DIR: &str = ".technocrat";

pub const CONSTITUTION_FILE: &str = "memory/constitution.md";
pub const CONFIG_FILE: &str = ".technocrat/config.yaml";

pub const SPEC_MD: &str = "spec.md";
pub const PLAN_MD: &str = "plan.md";
pub const TASKS_MD: &str = "tasks.md";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn specs_dir(root: &Path) -> PathBuf {
    root.join(SPECS_DIR)
}

pub fn feature_dir(root: &Path, feature: &str) -> PathBuf {
    specs_dir(root).join(feature)
}

pub fn feature_document(root: &Path, feature: &str, document: &str) -> PathBuf {
    feature_dir(root, feature).join(document)
}

pub fn memory_dir(root: &Path) -> PathBuf {
    root.join(MEMORY_DIR)
}

pub fn constitution_path(root: &Path) -> PathBuf {
    root.join(CONSTITUTION_FILE)
}

pub fn templates_dir(root: &Path) -> PathBuf {
    root.join(TEMPLATES_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn git_head_path(root: &Path) -> PathBuf {
    root.join(GIT_DIR).join("HEAD")
}

// ---------------------------------------------------------------------------
// Name validation
// ---------------------------------------------------------------------------

/// Reject names that could escape a feature directory via path traversal.
pub fn validate_document_name(name: &str) -> Result<()> {
    if !is_plain_file_name(name) {
        return Err(TechnocratError::InvalidDocumentName(name.to_string()));
    }
    Ok(())
}

pub fn is_plain_file_name(name: &str) -> bool {
    !(name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.contains('\0'))
}

static FEATURE_DIR_RE: OnceLock<Regex> = OnceLock::new();

fn feature_dir_re() -> &'static Regex {
    FEATURE_DIR_RE.get_or_init(|| Regex::new(r"^(\d{3})-").unwrap())
}

/// Numeric prefix of a feature directory name (`"007-auth"` → `Some(7)`).
pub fn feature_number(name: &str) -> Option<u32> {
    feature_dir_re()
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
