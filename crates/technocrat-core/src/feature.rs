//! Feature directories under `specs/`.

use crate::error::{Result, TechnocratError};
use crate::{assets, io, paths};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Longest branch name git hosts accept without complaint.
pub const MAX_BRANCH_BYTES: usize = 244;

const MAX_SLUG_WORDS: usize = 4;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "can", "for", "from", "have", "i",
    "in", "into", "is", "it", "need", "of", "on", "or", "our", "should", "so", "that", "the",
    "their", "this", "to", "up", "was", "we", "were", "will", "with", "want", "would", "you",
];

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

/// A feature directory and which of its core documents exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub has_spec: bool,
    pub has_plan: bool,
    pub has_tasks: bool,
}

impl Feature {
    fn from_dir(root: &Path, name: String) -> Self {
        let dir = paths::feature_dir(root, &name);
        Self {
            number: paths::feature_number(&name),
            has_spec: dir.join(paths::SPEC_MD).is_file(),
            has_plan: dir.join(paths::PLAN_MD).is_file(),
            has_tasks: dir.join(paths::TASKS_MD).is_file(),
            name,
        }
    }

    pub fn load(root: &Path, name: &str) -> Result<Self> {
        paths::validate_document_name(name)
            .map_err(|_| TechnocratError::FeatureNotFound(name.to_string()))?;
        if !paths::feature_dir(root, name).is_dir() {
            return Err(TechnocratError::FeatureNotFound(name.to_string()));
        }
        Ok(Self::from_dir(root, name.to_string()))
    }

    /// Every directory under `specs/`, sorted by name.
    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let specs = paths::specs_dir(root);
        if !specs.exists() {
            return Ok(Vec::new());
        }

        let mut features = Vec::new();
        for entry in std::fs::read_dir(&specs)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let name = entry.file_name().to_string_lossy().into_owned();
                features.push(Self::from_dir(root, name));
            }
        }
        features.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(features)
    }

    /// Read one document from this feature's directory.
    pub fn read_document(root: &Path, name: &str, document: &str) -> Result<String> {
        let feature = Self::load(root, name)?;
        paths::validate_document_name(document)?;
        let path = paths::feature_document(root, &feature.name, document);
        if !path.is_file() {
            return Err(TechnocratError::DocumentNotFound(format!(
                "{}/{}",
                feature.name, document
            )));
        }
        Ok(std::fs::read_to_string(path)?)
    }
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CreatedFeature {
    pub branch: String,
    pub number: u32,
    pub spec_file: PathBuf,
}

/// 1 + the highest `NNN-` prefix under `specs/`, or 1 when there is none.
pub fn next_number(root: &Path) -> Result<u32> {
    let max = Feature::list(root)?
        .iter()
        .filter_map(|f| f.number)
        .max()
        .unwrap_or(0);
    Ok(max + 1)
}

/// `NNN-<slug>`, where the slug comes from `short_name` when given and from
/// up to four meaningful words of `description` otherwise.
pub fn branch_name(number: u32, description: &str, short_name: Option<&str>) -> Result<String> {
    let words: Vec<String> = match short_name {
        Some(short) => slug_words(short).collect(),
        None => {
            let all: Vec<String> = slug_words(description).collect();
            let meaningful: Vec<String> = all
                .iter()
                .filter(|w| w.len() >= 3 && !STOP_WORDS.contains(&w.as_str()))
                .take(MAX_SLUG_WORDS)
                .cloned()
                .collect();
            if meaningful.is_empty() {
                all.into_iter().take(MAX_SLUG_WORDS).collect()
            } else {
                meaningful
            }
        }
    };
    if words.is_empty() {
        return Err(TechnocratError::InvalidFeatureName(description.to_string()));
    }

    let mut branch = format!("{number:03}-{}", words.join("-"));
    if branch.len() > MAX_BRANCH_BYTES {
        // Slugs are ASCII so any byte index is a char boundary.
        branch.truncate(MAX_BRANCH_BYTES);
        while branch.ends_with('-') {
            branch.pop();
        }
        tracing::warn!(branch = %branch, "branch name truncated to {MAX_BRANCH_BYTES} bytes");
    }
    Ok(branch)
}

fn slug_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Create `specs/<branch>/spec.md` from the spec template.
///
/// The workspace copy under `templates/` wins over the embedded one so
/// projects can customise it.
pub fn create(root: &Path, description: &str, short_name: Option<&str>) -> Result<CreatedFeature> {
    let number = next_number(root)?;
    let branch = branch_name(number, description, short_name)?;

    let dir = paths::feature_dir(root, &branch);
    if dir.exists() {
        return Err(TechnocratError::FeatureExists(branch));
    }

    let template = match io::read_optional(&paths::templates_dir(root).join("spec-template.md")) {
        Some(t) => t,
        None => assets::document("spec-template.md")?,
    };
    let spec = fill_spec_template(&template, &branch, description);

    let spec_file = dir.join(paths::SPEC_MD);
    io::atomic_write(&spec_file, spec.as_bytes())?;
    tracing::info!(feature = %branch, "created feature");

    Ok(CreatedFeature {
        branch,
        number,
        spec_file,
    })
}

fn fill_spec_template(template: &str, branch: &str, description: &str) -> String {
    let title = branch
        .split_once('-')
        .map(|(_, rest)| rest)
        .unwrap_or(branch)
        .split('-')
        .map(crate::template::title_case)
        .collect::<Vec<_>>()
        .join(" ");
    template
        .replace("[FEATURE NAME]", &title)
        .replace("[###-feature-name]", branch)
        .replace("[DATE]", &Utc::now().format("%Y-%m-%d").to_string())
        .replace("[DESCRIPTION]", description)
        .replace("$ARGUMENTS", description)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
