//! Command workflows behind the CLI
//!
//! Each workflow takes an already opened [VersionManager], so it can run
//! against the mock repository as well as a real one, and returns what the
//! binary prints.

use anyhow::{Context, Result};

use crate::boundary::BoundaryWarning;
use crate::domain::VersionDescriptor;
use crate::error::VersionError;
use crate::git::Repository;
use crate::manager::VersionManager;
use crate::ui;

/// How `describe` prints the descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// The full version string only
    #[default]
    Text,
    /// All fields, one per line
    Summary,
    Json,
    Toml,
}

/// Result of the describe workflow
#[derive(Debug, Clone, PartialEq)]
pub struct DescribeOutput {
    pub descriptor: VersionDescriptor,
    pub rendered: String,
    pub warnings: Vec<BoundaryWarning>,
}

/// Resolve the version and render it in `format`.
pub fn run_describe<R: Repository>(
    manager: &VersionManager<R>,
    format: OutputFormat,
) -> Result<DescribeOutput> {
    let branch = manager.resolve_branch()?;
    let descriptor = manager.describe()?;
    let warnings =
        BoundaryWarning::collect(&branch, &descriptor, &manager.config().branches.remote);

    let rendered = match format {
        OutputFormat::Text => descriptor.full_version().to_string(),
        OutputFormat::Summary => ui::format_descriptor(&descriptor),
        OutputFormat::Json => serde_json::to_string_pretty(&descriptor)
            .context("failed to serialize version descriptor")?,
        OutputFormat::Toml => {
            toml::to_string(&descriptor).context("failed to serialize version descriptor")?
        }
    };

    Ok(DescribeOutput {
        descriptor,
        rendered,
        warnings,
    })
}

/// Arguments for the dev tag workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TagWorkflowArgs {
    /// Only show the tag that would be created
    pub dry_run: bool,

    /// Ask before writing the tag
    pub confirm: bool,
}

/// Result of the dev tag workflow
#[derive(Debug, Clone, PartialEq)]
pub struct TagWorkflowResult {
    /// Name of the (proposed) tag
    pub tag: String,

    /// Whether the tag was written
    pub created: bool,
}

/// Create the next dev tag on HEAD.
pub fn run_tag_workflow<R: Repository>(
    manager: &VersionManager<R>,
    args: &TagWorkflowArgs,
) -> Result<TagWorkflowResult> {
    let plan = manager.plan_dev_tag()?;
    let name = plan.tag.to_string();

    if args.dry_run {
        ui::display_dev_tag_plan(&plan);
        ui::display_status(&format!("Dry run: tag {} was not created", name));
        return Ok(TagWorkflowResult {
            tag: name,
            created: false,
        });
    }

    if args.confirm {
        ui::display_dev_tag_plan(&plan);
        if !ui::confirm_action("Create this tag?")? {
            ui::display_status("Tag creation cancelled by user.");
            return Ok(TagWorkflowResult {
                tag: name,
                created: false,
            });
        }
    }

    let created = manager
        .create_dev_tag()
        .with_context(|| format!("failed to create dev tag '{}'", name))?;
    let name = created.to_string();

    ui::display_success(&format!("Created tag: {}", name));
    ui::display_manual_push_instruction(&name, &manager.config().branches.remote);

    Ok(TagWorkflowResult {
        tag: name,
        created: true,
    })
}

/// Advice printed after an error that a person has to fix in the tags
/// rather than in the build environment.
pub fn error_hint(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<VersionError>() {
        Some(e) if e.is_configuration_error() => Some(
            "The branch and tag layout of the repository needs fixing; rerunning the build will not help.",
        ),
        _ => None,
    }
}
