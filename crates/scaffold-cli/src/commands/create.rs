//! Create command implementation.
//!
//! Plans a Galasa project from the built-in bundle and writes it to disk,
//! either entry by entry or through a staging directory.

use crate::commands::config::Config;
use crate::project::ProjectRequest;
use anyhow::{Context, Result};
use clap::Args;
use scaffold_core::cli::{ExitCode, OutputFormat};
use scaffold_core::{EntryKind, FeatureName, FeatureSet, JavaPackageName};
use scaffold_files::{
    CancelFlag, MaterializationFailure, MaterializationResult, MaterializeOptions, Plan,
    apply_to_disk, materialize_staged,
};
use scaffold_templates::bundle::{FLAG_GRADLE, FLAG_MAVEN, builtin_registry};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Arguments of `scaffold create`.
#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Java package for the tests, e.g. `dev.galasa.banking.example`
    ///
    /// Names the parent project and prefixes every test project.
    #[arg(long)]
    pub package: String,

    /// Comma-separated features under test, e.g. "payee,account"
    #[arg(long)]
    pub features: Option<String>,

    /// Flavour flags for the test projects, e.g. `zos`
    #[arg(long = "flavor", value_delimiter = ',')]
    pub flavors: Vec<String>,

    /// Also create an OSGi Bundle Repository (OBR) project
    #[arg(long)]
    pub obr: bool,

    /// Generate Maven build files (the default build tool)
    #[arg(long)]
    pub maven: bool,

    /// Generate Gradle build files
    #[arg(long)]
    pub gradle: bool,

    /// Overwrite files that already exist
    #[arg(long)]
    pub force: bool,

    /// Point builds at the development Galasa repository
    #[arg(long)]
    pub development: bool,

    /// Build in a staging directory and move it into place only if every
    /// entry succeeds; the output directory must not exist yet
    #[arg(long, conflicts_with = "force")]
    pub staged: bool,

    /// Directory to create the project in
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the plan without writing anything
    #[arg(long)]
    pub dry_run: bool,
}

/// One planned entry, as printed by `--dry-run`.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedEntryReport {
    /// Target path
    pub path: PathBuf,
    /// Directory or file
    pub kind: EntryKind,
    /// Content length in bytes
    pub bytes: usize,
}

/// What `--dry-run` would create.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    /// Output directory
    pub root: PathBuf,
    /// Number of directories
    pub directories: usize,
    /// Number of files
    pub files: usize,
    /// Entries in creation order
    pub entries: Vec<PlannedEntryReport>,
}

impl From<&Plan> for PlanReport {
    fn from(plan: &Plan) -> Self {
        Self {
            root: plan.root().to_path_buf(),
            directories: plan.directory_count(),
            files: plan.file_count(),
            entries: plan
                .iter()
                .map(|entry| PlannedEntryReport {
                    path: entry.path().to_path_buf(),
                    kind: entry.kind(),
                    bytes: entry.content().len(),
                })
                .collect(),
        }
    }
}

/// Result of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct CreateReport {
    /// Output directory
    pub root: PathBuf,
    /// Whether a staging directory was used
    pub staged: bool,
    /// Whether every planned entry was created
    pub complete: bool,
    /// Entries present after the run, in plan order
    pub created: Vec<PathBuf>,
}

/// Builds a project request from the arguments, falling back to `config`
/// for features and build tools.
///
/// # Errors
///
/// Returns a validation error for a bad package or feature name.
pub fn build_request(args: &CreateArgs, config: &Config) -> scaffold_core::Result<ProjectRequest> {
    let package = JavaPackageName::new(args.package.trim())?;
    let features = match &args.features {
        Some(list) => FeatureName::parse_list(list)?,
        None => config
            .project
            .default_features
            .iter()
            .map(|name| FeatureName::new(name.as_str()))
            .collect::<scaffold_core::Result<_>>()?,
    };

    let mut request = ProjectRequest::new(package, features)?;
    request.flavors = args.flavors.iter().map(|f| f.trim()).collect::<FeatureSet>();
    request.obr = args.obr;
    if args.maven || args.gradle {
        request.maven = args.maven;
        request.gradle = args.gradle;
    } else {
        request.maven = config.uses_build_tool(FLAG_MAVEN);
        request.gradle = config.uses_build_tool(FLAG_GRADLE);
    }
    request.force = args.force;
    request.development = args.development;
    Ok(request)
}

/// Runs the create command.
///
/// Ctrl-C during generation stops before the next entry; entries already
/// written stay on disk unless `--staged` was given.
pub async fn run(args: CreateArgs, config: &Config, output_format: OutputFormat) -> Result<ExitCode> {
    let request = build_request(&args, config)?;
    let root = match &args.output {
        Some(dir) => dir.clone(),
        None => config.output_dir()?,
    };
    info!(package = %request.package, root = %root.display(), "Creating project");

    let registry = builtin_registry()?;
    let plan = request.plan(&registry, &root)?;
    debug!(entries = plan.len(), "Project planned");

    if args.dry_run {
        let output = crate::formatters::format_output(&PlanReport::from(&plan), output_format)
            .context("failed to format plan")?;
        println!("{output}");
        return Ok(ExitCode::SUCCESS);
    }

    let cancel = CancelFlag::new();
    let options = request
        .materialize_options()
        .with_cancel_flag(cancel.clone());
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current entry");
            cancel.cancel();
        }
    });

    let staged = args.staged;
    let result = tokio::task::spawn_blocking(move || generate(&plan, &options, staged))
        .await
        .context("generation task failed")?;
    watcher.abort();

    let report = CreateReport {
        root,
        staged,
        complete: result.is_success(),
        created: result.created_paths,
    };
    let output = crate::formatters::format_output(&report, output_format)
        .context("failed to format result")?;
    println!("{output}");

    match result.failure {
        None => Ok(ExitCode::SUCCESS),
        Some(failure) => Err(failure.error.into()),
    }
}

fn generate(plan: &Plan, options: &MaterializeOptions, staged: bool) -> MaterializationResult {
    if !staged {
        return apply_to_disk(plan, options);
    }

    match materialize_staged(plan, options) {
        Ok(created_paths) => MaterializationResult {
            created_paths,
            failure: None,
        },
        Err(error) => MaterializationResult {
            created_paths: Vec::new(),
            failure: Some(MaterializationFailure {
                path: error.path().unwrap_or_else(|| plan.root()).to_path_buf(),
                error,
            }),
        },
    }
}
