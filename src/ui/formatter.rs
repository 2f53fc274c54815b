//! Pure formatting functions for UI output.
//!
//! Results go to stdout so build scripts can capture them; everything else
//! (status, warnings, errors) goes to stderr.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::VersionDescriptor;
use crate::manager::{DevTagPlan, ResolvedBranch};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Human readable summary of a descriptor, one field per line.
pub fn format_descriptor(descriptor: &VersionDescriptor) -> String {
    let mut lines = vec![
        format!("version:        {}", descriptor.full_version()),
        format!("base version:   {}", descriptor.base_version()),
        format!(
            "branch:         {} ({})",
            descriptor.branch(),
            descriptor.branch_kind()
        ),
        format!("governing tag:  {}", descriptor.governing_tag()),
    ];
    if let Some(dev) = descriptor.dev_number() {
        lines.push(format!("dev number:     {}", dev));
    }
    lines.push(format!("commits since:  {}", descriptor.commits_since_tag()));
    lines.push(format!("commit:         {}", descriptor.short_hash()));
    lines.push(format!("dirty:          {}", descriptor.dirty()));
    lines.join("\n")
}

/// `<branch> <kind>` as printed by the `branch` command.
pub fn format_branch(branch: &ResolvedBranch) -> String {
    format!("{} {}", branch.name, branch.kind)
}

/// Show the tag `tag --dry-run` would create.
pub fn display_dev_tag_plan(plan: &DevTagPlan) {
    eprintln!("\n{}", style("Proposed Dev Tag:").bold());
    eprintln!("  From: {}", style(&plan.previous.name).red());
    eprintln!("  To:   {}", style(plan.tag.to_string()).green());
    eprintln!("  On:   {}", plan.head);
}

/// Display manual push instruction for a tag.
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    eprintln!(
        "\n{} To publish this tag, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {} {}", remote, tag)).cyan()
    );
}
