use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flasher_version::artifact;
use flasher_version::cli::{self, OutputFormat, TagWorkflowArgs};
use flasher_version::config;
use flasher_version::git::Git2Repository;
use flasher_version::ui;
use flasher_version::VersionManager;

#[derive(Parser)]
#[command(
    name = "flasher-version",
    version,
    about = "Derive build versions from git branches and tags"
)]
struct Args {
    #[arg(
        short = 'C',
        long = "repo",
        default_value = ".",
        help = "Path inside the repository to version"
    )]
    repo: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (repeatable)")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the version of the working copy
    Describe {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the resolved branch and its kind
    Branch,
    /// Create the next dev tag on HEAD
    Tag {
        #[arg(long, help = "Preview the tag without creating it")]
        dry_run: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,
    },
    /// Write the version into <project_version> of a setup XML file
    Stamp { xml: PathBuf },
    /// Render a version resource from a template
    Template { template: PathBuf, output: PathBuf },
    /// Print the package file name for the current version
    PackageName {
        name: String,

        #[arg(long, default_value = "zip")]
        ext: String,
    },
    /// Write checksum files for a build artifact
    Hash {
        /// Artifact path or glob matching exactly one file
        artifact: String,

        #[arg(long, help = "Write MD5, SHA1 and SHA-2 digests to a .hash file")]
        all: bool,

        #[arg(long, requires = "all", help = "Hash file path (default <artifact>.hash)")]
        output: Option<PathBuf>,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        if let Some(hint) = cli::error_hint(&e) {
            ui::display_status(hint);
        }
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_manager(repo: &Path, config_path: Option<&Path>) -> Result<VersionManager<Git2Repository>> {
    let manager =
        VersionManager::open_with(repo, |root| config::load_config(config_path, root))?;
    Ok(manager)
}

fn run(args: Args) -> Result<()> {
    let config_path = args.config.as_deref();

    match args.command {
        Command::Hash {
            artifact: input,
            all,
            output,
        } => {
            let written = if all {
                artifact::write_hash_file(&input, output.as_deref())?
            } else {
                let path = artifact::hash::resolve_single(&input)?;
                artifact::write_sha256_sidecar(&path)?
            };
            println!("{}", written.display());
        }
        Command::Describe { format } => {
            let manager = open_manager(&args.repo, config_path)?;
            let output = cli::run_describe(&manager, format)?;
            for warning in &output.warnings {
                ui::display_boundary_warning(warning);
            }
            println!("{}", output.rendered);
        }
        Command::Branch => {
            let manager = open_manager(&args.repo, config_path)?;
            let branch = manager.resolve_branch()?;
            println!("{}", ui::format_branch(&branch));
        }
        Command::Tag { dry_run, yes } => {
            let manager = open_manager(&args.repo, config_path)?;
            let workflow = TagWorkflowArgs {
                dry_run,
                confirm: !yes && ui::is_interactive(),
            };
            let result = cli::run_tag_workflow(&manager, &workflow)?;
            if result.created || dry_run {
                println!("{}", result.tag);
            }
        }
        Command::Stamp { xml } => {
            let manager = open_manager(&args.repo, config_path)?;
            let version = manager.render_version_string()?;
            let changed = artifact::stamp_project_version(&xml, &version)
                .with_context(|| format!("failed to stamp {}", xml.display()))?;
            if changed {
                ui::display_success(&format!("Stamped {} into {}", version, xml.display()));
            } else {
                ui::display_status(&format!("{} already at {}", xml.display(), version));
            }
            println!("{}", version);
        }
        Command::Template { template, output } => {
            let manager = open_manager(&args.repo, config_path)?;
            let descriptor = manager.describe()?;
            let changed = artifact::render_template(&template, &output, &descriptor)
                .with_context(|| format!("failed to render {}", template.display()))?;
            if changed {
                ui::display_success(&format!("Wrote {}", output.display()));
            } else {
                ui::display_status(&format!("{} is up to date", output.display()));
            }
            println!("{}", descriptor.full_version());
        }
        Command::PackageName { name, ext } => {
            let manager = open_manager(&args.repo, config_path)?;
            let version = manager.render_version_string()?;
            println!("{}", artifact::package_file_name(&name, &version, &ext));
        }
    }

    Ok(())
}
