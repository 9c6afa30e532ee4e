use crate::output::{print_json, print_table};
use crate::root::workspace_root;
use anyhow::Context;
use clap::Subcommand;
use serde::Serialize;
use std::path::Path;
use technocrat_core::{
    feature::{self, CreatedFeature, Feature},
    git, workspace,
};

#[derive(Subcommand)]
pub enum FeatureSubcommand {
    /// Create the next numbered feature from a description
    Create {
        description: String,
        /// Branch suffix to use instead of one derived from the description
        #[arg(long)]
        short_name: Option<String>,
        /// Don't create a git branch
        #[arg(long)]
        no_branch: bool,
    },
    /// List features under specs/
    List,
    /// Show the detected workspace context
    Current,
}

pub fn run(start: &Path, subcmd: FeatureSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        FeatureSubcommand::Create {
            description,
            short_name,
            no_branch,
        } => create(start, &description, short_name.as_deref(), no_branch, json),
        FeatureSubcommand::List => list(start, json),
        FeatureSubcommand::Current => current(start, json),
    }
}

#[derive(Serialize)]
struct CreateReport {
    #[serde(flatten)]
    feature: CreatedFeature,
    git_branch: bool,
}

fn create(
    start: &Path,
    description: &str,
    short_name: Option<&str>,
    no_branch: bool,
    json: bool,
) -> anyhow::Result<()> {
    let root = workspace_root(start);
    let created = feature::create(&root, description, short_name)
        .with_context(|| format!("failed to create feature for '{description}'"))?;

    let mut git_branch = false;
    if !no_branch && git::is_available(&root) {
        match git::create_branch(&root, &created.branch) {
            Ok(()) => git_branch = true,
            Err(e) => tracing::warn!(branch = %created.branch, error = %e, "branch not created"),
        }
    }

    if json {
        return print_json(&CreateReport {
            feature: created,
            git_branch,
        });
    }

    println!("Created feature: {}", created.branch);
    println!("  spec: {}", created.spec_file.display());
    if git_branch {
        println!("  branch: {} (checked out)", created.branch);
    }
    println!("Next: fill in the spec, then `technocrat prompt plan`");
    Ok(())
}

fn list(start: &Path, json: bool) -> anyhow::Result<()> {
    let root = workspace_root(start);
    let features = Feature::list(&root).context("failed to list features")?;

    if json {
        return print_json(&features);
    }
    if features.is_empty() {
        println!("No features yet.");
        return Ok(());
    }

    let mark = |present: bool| (if present { "yes" } else { "-" }).to_string();
    let rows: Vec<Vec<String>> = features
        .iter()
        .map(|f| {
            vec![
                f.name.clone(),
                mark(f.has_spec),
                mark(f.has_plan),
                mark(f.has_tasks),
            ]
        })
        .collect();
    print_table(&["FEATURE", "SPEC", "PLAN", "TASKS"], &rows);
    Ok(())
}

fn current(start: &Path, json: bool) -> anyhow::Result<()> {
    let ctx = workspace::detect_from(start);
    if json {
        return print_json(&ctx);
    }

    let dash = |s: &str| (if s.is_empty() { "-" } else { s }).to_string();
    let root = ctx
        .root
        .as_ref()
        .map(|r| r.display().to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("root:    {root}");
    println!("project: {}", dash(&ctx.project_name));
    println!("feature: {}", dash(&ctx.feature_name));
    println!("branch:  {}", dash(&ctx.branch));
    Ok(())
}
